use glam::IVec3;
use voxcel_core::axis::Axis;
use voxcel_world::{ArrayRegistry, Cell, OcclusionData};

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub array_count: u32,
    pub array_size: [i32; 3],
    /// Share of cells holding a literal value, in percent.
    pub value_pct: u32,
    /// Share of cells holding a formula, in percent.
    pub formula_pct: u32,
    /// Z layers to ghost on every array.
    pub blocked_layers: Vec<i32>,
}

/// Return the standard suite of benchmark scenes (512 to ~400K cells).
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "single-8",
            array_count: 1,
            array_size: [8, 8, 8],
            value_pct: 40,
            formula_pct: 10,
            blocked_layers: Vec::new(),
        },
        SceneConfig {
            name: "single-32",
            array_count: 1,
            array_size: [32, 32, 32],
            value_pct: 40,
            formula_pct: 10,
            blocked_layers: Vec::new(),
        },
        SceneConfig {
            name: "ghosted-32",
            array_count: 1,
            array_size: [32, 32, 32],
            value_pct: 40,
            formula_pct: 10,
            blocked_layers: (1..32).collect(),
        },
        SceneConfig {
            name: "grid-8x16",
            array_count: 8,
            array_size: [16, 16, 16],
            value_pct: 25,
            formula_pct: 5,
            blocked_layers: Vec::new(),
        },
        SceneConfig {
            name: "large-64x64x96",
            array_count: 1,
            array_size: [64, 64, 96],
            value_pct: 60,
            formula_pct: 20,
            blocked_layers: Vec::new(),
        },
    ]
}

/// Deterministic cell content for a position.
/// ~`value_pct`% numbers, ~`formula_pct`% formulas, rest empty.
pub fn bench_cell(array_index: u32, coord: IVec3, config: &SceneConfig) -> Cell {
    let h = (array_index as usize).wrapping_mul(31337)
        ^ (coord.x as usize).wrapping_mul(7919)
        ^ (coord.y as usize).wrapping_mul(104_729)
        ^ (coord.z as usize).wrapping_mul(15_485_863);
    let bucket = (h % 100) as u32;
    if bucket < config.value_pct {
        Cell::with_value(coord, (h % 1000) as f64)
    } else if bucket < config.value_pct + config.formula_pct {
        Cell::with_formula(coord, format!("=A1+{}", h % 10))
    } else {
        Cell::empty(coord)
    }
}

/// Build every array of a scene, laid out along X with a one-cell gap.
pub fn build_registry(config: &SceneConfig) -> ArrayRegistry {
    let mut registry = ArrayRegistry::new();
    let size = IVec3::from_array(config.array_size);

    for a in 0..config.array_count {
        let id = registry.create(size);
        let Some(arr) = registry.get_mut(id) else {
            continue;
        };
        arr.offset = IVec3::new(a as i32 * (size.x + 1), 0, 0);
        for z in 0..size.z {
            for y in 0..size.y {
                for x in 0..size.x {
                    arr.set_cell(bench_cell(a, IVec3::new(x, y, z), config));
                }
            }
        }
        if !config.blocked_layers.is_empty() {
            arr.occlusion = Some(OcclusionData::new(
                Axis::Z,
                config.blocked_layers.iter().copied(),
            ));
        }
    }

    registry
}
