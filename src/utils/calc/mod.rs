pub mod big_num;
pub mod fee;
pub mod option_math;
pub mod tick_lattice;
pub mod wad;

pub use big_num::U256;
pub use fee::compute_taker_fee;
pub use option_math::breakeven_price;
pub use tick_lattice::{TickRange, snap_to_valid_range};
pub use wad::{WAD, Wad};
