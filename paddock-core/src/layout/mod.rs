mod record_layout;
pub use self::record_layout::*;

mod record_type;
pub use self::record_type::*;
