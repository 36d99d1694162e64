//! scx — раскладки записей карт (секции MRGN, THG2, UNIT, TRIG/MBRF).
//!
//! Только данные и кодек: значения полей не интерпретируются.
//! Все многобайтовые поля — little-endian, поля идут подряд без выравнивания.
//!
//! - location.rs — Location [MRGN], 20 байт
//! - sprite.rs   — Sprite [THG2], 10 байт
//! - unit.rs     — Unit [UNIT], 36 байт (+ UnitProperties, 22 байта)
//! - trigger.rs  — Trigger [TRIG, MBRF], 2400 байт (Condition ×16, Action ×64)

pub mod location;
pub mod sprite;
pub mod unit;
pub mod trigger;

pub use location::Location;
pub use sprite::Sprite;
pub use unit::{Unit, UnitProperties};
pub use trigger::{Action, Condition, Trigger};

/// Имена секций, в которых лежат эти записи.
pub const SECTION_LOCATIONS: &str = "MRGN";
pub const SECTION_SPRITES: &str = "THG2";
pub const SECTION_UNITS: &str = "UNIT";
pub const SECTION_TRIGGERS: &str = "TRIG";
pub const SECTION_BRIEFING: &str = "MBRF";
