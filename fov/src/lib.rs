//! Generic field-of-view computation.

mod shadowcast;
pub use shadowcast::{
    calc_visible_cells_from, Config, Restrictiveness, RADIUS_FUDGE,
};
