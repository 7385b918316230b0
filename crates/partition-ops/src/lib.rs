pub mod config;
pub mod cut;
pub mod partition;
pub mod place;
pub mod resolve;
pub mod types;
pub mod validate;

pub use config::{PanelEnvelope, PlacementConfig};
pub use cut::{compute_cut, compute_cut_with_depth, execute_cut, structural_box};
pub use partition::{compute_partition, compute_partition_with_depth, execute_partition};
pub use place::{execute_placement, requested_thickness};
pub use resolve::resolve_conflict;
pub use types::*;
pub use validate::{
    can_insert_lateral, check_collision, find_collisions, is_within_space_bounds,
    validate_panel_size,
};
