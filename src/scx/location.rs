//! Location [MRGN]: прямоугольник + строка имени + флаги высот.

use byteorder::{ByteOrder, LittleEndian};

use crate::record::{Field, FieldKind, Record};

pub const LOC_OFF_LEFT: usize = 0;
pub const LOC_OFF_TOP: usize = 4;
pub const LOC_OFF_RIGHT: usize = 8;
pub const LOC_OFF_BOTTOM: usize = 12;
pub const LOC_OFF_NAME: usize = 16;
pub const LOC_OFF_FLAGS: usize = 18;

// Флаги высот
pub const LOC_FLAG_LOW_GROUND: i16 = 0x01;
pub const LOC_FLAG_MEDIUM_GROUND: i16 = 0x02;
pub const LOC_FLAG_HIGH_GROUND: i16 = 0x04;
pub const LOC_FLAG_LOW_AIR: i16 = 0x08;
pub const LOC_FLAG_MEDIUM_AIR: i16 = 0x10;
pub const LOC_FLAG_HIGH_AIR: i16 = 0x20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    /// Индекс строки имени.
    pub name: i16,
    pub flags: i16,
}

impl Record for Location {
    const LAYOUT: &'static [Field] = &[
        Field::new("left", LOC_OFF_LEFT, 4, FieldKind::Signed),
        Field::new("top", LOC_OFF_TOP, 4, FieldKind::Signed),
        Field::new("right", LOC_OFF_RIGHT, 4, FieldKind::Signed),
        Field::new("bottom", LOC_OFF_BOTTOM, 4, FieldKind::Signed),
        Field::new("name", LOC_OFF_NAME, 2, FieldKind::Signed),
        Field::new("flags", LOC_OFF_FLAGS, 2, FieldKind::Signed),
    ];

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_i32(&mut out[LOC_OFF_LEFT..LOC_OFF_LEFT + 4], self.left);
        LittleEndian::write_i32(&mut out[LOC_OFF_TOP..LOC_OFF_TOP + 4], self.top);
        LittleEndian::write_i32(&mut out[LOC_OFF_RIGHT..LOC_OFF_RIGHT + 4], self.right);
        LittleEndian::write_i32(&mut out[LOC_OFF_BOTTOM..LOC_OFF_BOTTOM + 4], self.bottom);
        LittleEndian::write_i16(&mut out[LOC_OFF_NAME..LOC_OFF_NAME + 2], self.name);
        LittleEndian::write_i16(&mut out[LOC_OFF_FLAGS..LOC_OFF_FLAGS + 2], self.flags);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            left: LittleEndian::read_i32(&buf[LOC_OFF_LEFT..LOC_OFF_LEFT + 4]),
            top: LittleEndian::read_i32(&buf[LOC_OFF_TOP..LOC_OFF_TOP + 4]),
            right: LittleEndian::read_i32(&buf[LOC_OFF_RIGHT..LOC_OFF_RIGHT + 4]),
            bottom: LittleEndian::read_i32(&buf[LOC_OFF_BOTTOM..LOC_OFF_BOTTOM + 4]),
            name: LittleEndian::read_i16(&buf[LOC_OFF_NAME..LOC_OFF_NAME + 2]),
            flags: LittleEndian::read_i16(&buf[LOC_OFF_FLAGS..LOC_OFF_FLAGS + 2]),
        }
    }
}
