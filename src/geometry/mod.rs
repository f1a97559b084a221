pub mod hit_testing;
pub mod transform;

pub use transform::{
    TransformMatrix, ViewTransform, fit_to_view, flip_horizontal_remap, flip_vertical_remap,
    quarter_turn_remap, quarter_turns,
};
