//! Sprite [THG2].

use byteorder::{ByteOrder, LittleEndian};

use crate::record::{Field, FieldKind, Record};

pub const SPR_OFF_ID: usize = 0;
pub const SPR_OFF_X: usize = 2;
pub const SPR_OFF_Y: usize = 4;
pub const SPR_OFF_PLAYER: usize = 6;
pub const SPR_OFF_UNUSED: usize = 7;
pub const SPR_OFF_FLAGS: usize = 8;

pub const SPR_FLAG_DRAW_AS_SPRITE: u16 = 0x0800;
pub const SPR_FLAG_SPRITE: u16 = 0x1000;
pub const SPR_FLAG_UNIT: u16 = 0x2000;
pub const SPR_FLAG_FLIPPED: u16 = 0x4000;
pub const SPR_FLAG_DISABLED: u16 = 0x8000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sprite {
    /// Sprite ID или Unit ID (см. flags).
    pub id: u16,
    pub x: u16,
    pub y: u16,
    pub player: u8,
    pub unused: u8,
    pub flags: u16,
}

impl Record for Sprite {
    const LAYOUT: &'static [Field] = &[
        Field::new("id", SPR_OFF_ID, 2, FieldKind::Unsigned),
        Field::new("x", SPR_OFF_X, 2, FieldKind::Unsigned),
        Field::new("y", SPR_OFF_Y, 2, FieldKind::Unsigned),
        Field::new("player", SPR_OFF_PLAYER, 1, FieldKind::Unsigned),
        Field::new("unused", SPR_OFF_UNUSED, 1, FieldKind::Unsigned),
        Field::new("flags", SPR_OFF_FLAGS, 2, FieldKind::Unsigned),
    ];

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_u16(&mut out[SPR_OFF_ID..SPR_OFF_ID + 2], self.id);
        LittleEndian::write_u16(&mut out[SPR_OFF_X..SPR_OFF_X + 2], self.x);
        LittleEndian::write_u16(&mut out[SPR_OFF_Y..SPR_OFF_Y + 2], self.y);
        out[SPR_OFF_PLAYER] = self.player;
        out[SPR_OFF_UNUSED] = self.unused;
        LittleEndian::write_u16(&mut out[SPR_OFF_FLAGS..SPR_OFF_FLAGS + 2], self.flags);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            id: LittleEndian::read_u16(&buf[SPR_OFF_ID..SPR_OFF_ID + 2]),
            x: LittleEndian::read_u16(&buf[SPR_OFF_X..SPR_OFF_X + 2]),
            y: LittleEndian::read_u16(&buf[SPR_OFF_Y..SPR_OFF_Y + 2]),
            player: buf[SPR_OFF_PLAYER],
            unused: buf[SPR_OFF_UNUSED],
            flags: LittleEndian::read_u16(&buf[SPR_OFF_FLAGS..SPR_OFF_FLAGS + 2]),
        }
    }
}
