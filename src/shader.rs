//! WGSL sources for the flux compute backend.
//!
//! The kernel evaluates exactly the same displacement as
//! [`turbulence`](crate::particles::flux::turbulence), one invocation per
//! particle. The sources are plain strings so they can be validated without a
//! GPU and inspected when a pipeline fails to build.
//!
//! # Bindings
//!
//! | Binding | Type | Contents |
//! |---------|------|----------|
//! | 0 | `storage, read` | `array<FluxParticle>`, rest position and randoms |
//! | 1 | `storage, read_write` | `array<FluxSample>`, displaced position and noise |
//! | 2 | `uniform` | `FluxUniforms` |

/// Workgroup size of the flux kernel.
pub const WORKGROUP_SIZE: u32 = 256;

/// 2D simplex noise, matching [`simplex2`](crate::noise::simplex2).
pub const SIMPLEX_WGSL: &str = r#"
fn mod289_2(x: vec2<f32>) -> vec2<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn mod289_3(x: vec3<f32>) -> vec3<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn permute3(x: vec3<f32>) -> vec3<f32> {
    return mod289_3((x * 34.0 + 1.0) * x);
}

fn simplex2(v: vec2<f32>) -> f32 {
    let C = vec4<f32>(0.211324865405187, 0.366025403784439, -0.577350269189626, 0.024390243902439);

    // First corner
    var i = floor(v + dot(v, C.yy));
    let x0 = v - i + dot(i, C.xx);

    // Other corners
    let i1 = select(vec2<f32>(0.0, 1.0), vec2<f32>(1.0, 0.0), x0.x > x0.y);
    let x12a = x0 + C.xx - i1;
    let x12b = x0 + C.zz;

    // Permutations
    i = mod289_2(i);
    let p = permute3(
        permute3(i.y + vec3<f32>(0.0, i1.y, 1.0)) + i.x + vec3<f32>(0.0, i1.x, 1.0)
    );

    let falloff = vec3<f32>(dot(x0, x0), dot(x12a, x12a), dot(x12b, x12b));
    var m = max(vec3<f32>(0.5) - falloff, vec3<f32>(0.0));
    m = m * m;
    m = m * m;

    let scaled = p * C.www;
    let x = 2.0 * (scaled - floor(scaled)) - 1.0;
    let h = abs(x) - 0.5;
    let ox = floor(x + 0.5);
    let a0 = x - ox;

    m = m * (1.79284291400159 - 0.85373472095314 * (a0 * a0 + h * h));

    let g = vec3<f32>(
        a0.x * x0.x + h.x * x0.y,
        a0.y * x12a.x + h.y * x12a.y,
        a0.z * x12b.x + h.z * x12b.y,
    );
    return 130.0 * dot(m, g);
}
"#;

/// Flux displacement kernel. Needs [`SIMPLEX_WGSL`] prepended.
pub const FLUX_KERNEL_WGSL: &str = r#"
struct FluxParticle {
    rest: vec3<f32>,
    randoms: vec3<f32>,
};

struct FluxSample {
    position: vec3<f32>,
    noise: f32,
};

struct FluxUniforms {
    time: f32,
    speed: f32,
    chaos: f32,
    count: u32,
};

@group(0) @binding(0) var<storage, read> particles: array<FluxParticle>;
@group(0) @binding(1) var<storage, read_write> samples: array<FluxSample>;
@group(0) @binding(2) var<uniform> uniforms: FluxUniforms;

@compute @workgroup_size(256)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let index = global_id.x;
    if index >= uniforms.count {
        return;
    }

    let particle = particles[index];
    var pos = particle.rest;
    let t = uniforms.time * uniforms.speed * (0.5 + particle.randoms.y * 0.5);
    let n = simplex2(pos.xy * 0.05 + vec2<f32>(t * 0.1));
    let swirl = n * uniforms.chaos * 0.1;

    pos.x = pos.x + sin(pos.y * 0.1 + t + swirl);
    pos.y = pos.y + cos(pos.x * 0.1 + t + swirl);
    pos.z = pos.z + sin(pos.x * 0.2 + t) * (uniforms.chaos * 0.1);

    samples[index] = FluxSample(pos, n);
}
"#;

/// Complete flux compute shader source.
pub fn flux_compute_shader() -> String {
    format!("{SIMPLEX_WGSL}\n{FLUX_KERNEL_WGSL}")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_flux_shader_valid() {
        let source = flux_compute_shader();
        if let Err(e) = validate_wgsl(&source) {
            panic!("flux shader failed validation:\n{e}\n\n{source}");
        }
    }

    #[test]
    fn test_simplex_standalone_valid() {
        let code = format!(
            "{SIMPLEX_WGSL}\n@compute @workgroup_size(1)\nfn main() {{\n    \
             let n = simplex2(vec2<f32>(0.3, 0.7));\n}}\n"
        );
        validate_wgsl(&code).unwrap();
    }

    #[test]
    fn test_workgroup_size_matches_kernel() {
        assert!(FLUX_KERNEL_WGSL.contains(&format!("@workgroup_size({WORKGROUP_SIZE})")));
    }

    #[test]
    fn test_kernel_bindings() {
        let module = naga::front::wgsl::parse_str(&flux_compute_shader()).unwrap();
        let mut bindings: Vec<u32> = module
            .global_variables
            .iter()
            .filter_map(|(_, var)| var.binding.as_ref().map(|b| b.binding))
            .collect();
        bindings.sort_unstable();
        assert_eq!(bindings, vec![0, 1, 2]);
        assert!(module.entry_points.iter().any(|ep| ep.name == "main"));
    }
}
