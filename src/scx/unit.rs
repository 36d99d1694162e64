//! Unit [UNIT] и встроенные свойства юнита.

use byteorder::{ByteOrder, LittleEndian};

use crate::record::{Field, FieldKind, Record};

// ---------- UnitProperties (22 байта) ----------
pub const UPRP_OFF_LINK: usize = 0;
pub const UPRP_OFF_VALID: usize = 2;
pub const UPRP_OFF_USED: usize = 4;
pub const UPRP_OFF_PLAYER: usize = 6;
pub const UPRP_OFF_HP: usize = 7;
pub const UPRP_OFF_SP: usize = 8;
pub const UPRP_OFF_EP: usize = 9;
pub const UPRP_OFF_RESOURCE: usize = 10;
pub const UPRP_OFF_HANGAR: usize = 14;
pub const UPRP_OFF_STATE: usize = 16;
pub const UPRP_OFF_UNUSED: usize = 18;

// ---------- Unit (36 байт) ----------
pub const UNIT_OFF_CLASS: usize = 0;
pub const UNIT_OFF_X: usize = 4;
pub const UNIT_OFF_Y: usize = 6;
pub const UNIT_OFF_ID: usize = 8;
pub const UNIT_OFF_PROPS: usize = 10;
pub const UNIT_OFF_NEXT: usize = 32;

// Link type
pub const UNIT_LINK_NYDUS: u16 = 0x200;
pub const UNIT_LINK_ADDON: u16 = 0x400;

// State
pub const UNIT_STATE_CLOAK: u16 = 0x01;
pub const UNIT_STATE_BURROW: u16 = 0x02;
pub const UNIT_STATE_TRANSIT: u16 = 0x04;
pub const UNIT_STATE_HALLUCINATION: u16 = 0x08;
pub const UNIT_STATE_INVINCIBLE: u16 = 0x10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitProperties {
    pub link: u16,
    pub valid: u16,
    pub used: u16,
    pub player: u8,
    pub hp: u8,
    pub sp: u8,
    pub ep: u8,
    pub resource: u32,
    pub hangar: u16,
    pub state: u16,
    pub unused: u32,
}

impl Record for UnitProperties {
    const LAYOUT: &'static [Field] = &[
        Field::new("link", UPRP_OFF_LINK, 2, FieldKind::Unsigned),
        Field::new("valid", UPRP_OFF_VALID, 2, FieldKind::Unsigned),
        Field::new("used", UPRP_OFF_USED, 2, FieldKind::Unsigned),
        Field::new("player", UPRP_OFF_PLAYER, 1, FieldKind::Unsigned),
        Field::new("hp", UPRP_OFF_HP, 1, FieldKind::Unsigned),
        Field::new("sp", UPRP_OFF_SP, 1, FieldKind::Unsigned),
        Field::new("ep", UPRP_OFF_EP, 1, FieldKind::Unsigned),
        Field::new("resource", UPRP_OFF_RESOURCE, 4, FieldKind::Unsigned),
        Field::new("hangar", UPRP_OFF_HANGAR, 2, FieldKind::Unsigned),
        Field::new("state", UPRP_OFF_STATE, 2, FieldKind::Unsigned),
        Field::new("unused", UPRP_OFF_UNUSED, 4, FieldKind::Unsigned),
    ];

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_u16(&mut out[UPRP_OFF_LINK..UPRP_OFF_LINK + 2], self.link);
        LittleEndian::write_u16(&mut out[UPRP_OFF_VALID..UPRP_OFF_VALID + 2], self.valid);
        LittleEndian::write_u16(&mut out[UPRP_OFF_USED..UPRP_OFF_USED + 2], self.used);
        out[UPRP_OFF_PLAYER] = self.player;
        out[UPRP_OFF_HP] = self.hp;
        out[UPRP_OFF_SP] = self.sp;
        out[UPRP_OFF_EP] = self.ep;
        LittleEndian::write_u32(&mut out[UPRP_OFF_RESOURCE..UPRP_OFF_RESOURCE + 4], self.resource);
        LittleEndian::write_u16(&mut out[UPRP_OFF_HANGAR..UPRP_OFF_HANGAR + 2], self.hangar);
        LittleEndian::write_u16(&mut out[UPRP_OFF_STATE..UPRP_OFF_STATE + 2], self.state);
        LittleEndian::write_u32(&mut out[UPRP_OFF_UNUSED..UPRP_OFF_UNUSED + 4], self.unused);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            link: LittleEndian::read_u16(&buf[UPRP_OFF_LINK..UPRP_OFF_LINK + 2]),
            valid: LittleEndian::read_u16(&buf[UPRP_OFF_VALID..UPRP_OFF_VALID + 2]),
            used: LittleEndian::read_u16(&buf[UPRP_OFF_USED..UPRP_OFF_USED + 2]),
            player: buf[UPRP_OFF_PLAYER],
            hp: buf[UPRP_OFF_HP],
            sp: buf[UPRP_OFF_SP],
            ep: buf[UPRP_OFF_EP],
            resource: LittleEndian::read_u32(&buf[UPRP_OFF_RESOURCE..UPRP_OFF_RESOURCE + 4]),
            hangar: LittleEndian::read_u16(&buf[UPRP_OFF_HANGAR..UPRP_OFF_HANGAR + 2]),
            state: LittleEndian::read_u16(&buf[UPRP_OFF_STATE..UPRP_OFF_STATE + 2]),
            unused: LittleEndian::read_u32(&buf[UPRP_OFF_UNUSED..UPRP_OFF_UNUSED + 4]),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unit {
    /// Class instance (serial).
    pub class: u32,
    pub x: u16,
    pub y: u16,
    pub id: u16,
    pub properties: UnitProperties,
    /// Class instance связанного юнита (nydus/addon).
    pub next: u32,
}

impl Record for Unit {
    const LAYOUT: &'static [Field] = &[
        Field::new("class", UNIT_OFF_CLASS, 4, FieldKind::Unsigned),
        Field::new("x", UNIT_OFF_X, 2, FieldKind::Unsigned),
        Field::new("y", UNIT_OFF_Y, 2, FieldKind::Unsigned),
        Field::new("id", UNIT_OFF_ID, 2, FieldKind::Unsigned),
        Field::new("properties", UNIT_OFF_PROPS, UnitProperties::SIZE, FieldKind::Nested),
        Field::new("next", UNIT_OFF_NEXT, 4, FieldKind::Unsigned),
    ];

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_u32(&mut out[UNIT_OFF_CLASS..UNIT_OFF_CLASS + 4], self.class);
        LittleEndian::write_u16(&mut out[UNIT_OFF_X..UNIT_OFF_X + 2], self.x);
        LittleEndian::write_u16(&mut out[UNIT_OFF_Y..UNIT_OFF_Y + 2], self.y);
        LittleEndian::write_u16(&mut out[UNIT_OFF_ID..UNIT_OFF_ID + 2], self.id);
        self.properties
            .encode(&mut out[UNIT_OFF_PROPS..UNIT_OFF_PROPS + UnitProperties::SIZE]);
        LittleEndian::write_u32(&mut out[UNIT_OFF_NEXT..UNIT_OFF_NEXT + 4], self.next);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            class: LittleEndian::read_u32(&buf[UNIT_OFF_CLASS..UNIT_OFF_CLASS + 4]),
            x: LittleEndian::read_u16(&buf[UNIT_OFF_X..UNIT_OFF_X + 2]),
            y: LittleEndian::read_u16(&buf[UNIT_OFF_Y..UNIT_OFF_Y + 2]),
            id: LittleEndian::read_u16(&buf[UNIT_OFF_ID..UNIT_OFF_ID + 2]),
            properties: UnitProperties::decode(
                &buf[UNIT_OFF_PROPS..UNIT_OFF_PROPS + UnitProperties::SIZE],
            ),
            next: LittleEndian::read_u32(&buf[UNIT_OFF_NEXT..UNIT_OFF_NEXT + 4]),
        }
    }
}
