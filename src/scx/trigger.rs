//! Триггеры [TRIG]: 16 условий + 64 действия + флаги исполнения + маска игроков.

use byteorder::{ByteOrder, LittleEndian};

use crate::record::{Field, FieldKind, Record};

pub const TRIG_CONDITIONS: usize = 16;
pub const TRIG_ACTIONS: usize = 64;
pub const TRIG_PLAYERS: usize = 28;

// ---------- Condition (20 байт) ----------
pub const COND_OFF_LOCATION: usize = 0;
pub const COND_OFF_PLAYERS: usize = 4;
pub const COND_OFF_QUANTITY: usize = 8;
pub const COND_OFF_UNIT: usize = 12;
pub const COND_OFF_COMPARE: usize = 14;
pub const COND_OFF_ID: usize = 15;
pub const COND_OFF_TYPE: usize = 16;
pub const COND_OFF_FLAGS: usize = 17;
pub const COND_OFF_NEXT: usize = 18;

// ---------- Action (32 байта) ----------
pub const ACT_OFF_LOCATION: usize = 0;
pub const ACT_OFF_TEXT: usize = 4;
pub const ACT_OFF_WAVE: usize = 8;
pub const ACT_OFF_TIME: usize = 12;
pub const ACT_OFF_PLAYERS: usize = 16;
pub const ACT_OFF_PARAM: usize = 20;
pub const ACT_OFF_TYPE: usize = 24;
pub const ACT_OFF_ID: usize = 26;
pub const ACT_OFF_PARAM2: usize = 27;
pub const ACT_OFF_FLAGS: usize = 28;
pub const ACT_OFF_NEXT: usize = 30;

// ---------- Trigger (2400 байт) ----------
pub const TRIG_OFF_CONDITIONS: usize = 0;
pub const TRIG_OFF_ACTIONS: usize = TRIG_OFF_CONDITIONS + TRIG_CONDITIONS * 20;
pub const TRIG_OFF_FLAGS: usize = TRIG_OFF_ACTIONS + TRIG_ACTIONS * 32;
pub const TRIG_OFF_PLAYERS: usize = TRIG_OFF_FLAGS + 4;

// Condition flags
pub const COND_FLAG_DISABLED: u8 = 0x02;
pub const COND_FLAG_ALWAYS_DISPLAY: u8 = 0x04;
pub const COND_FLAG_UNIT_PROPERTIES: u8 = 0x08;
pub const COND_FLAG_UNIT_TYPE: u8 = 0x10;

// Action flags
pub const ACT_FLAG_IGNORE_ONCE: u16 = 0x01;
pub const ACT_FLAG_DISABLED: u16 = 0x02;
pub const ACT_FLAG_ALWAYS_DISPLAY: u16 = 0x04;
pub const ACT_FLAG_UNIT_PROPERTIES: u16 = 0x08;

// Trigger execution flags
pub const TRIG_FLAG_ACTIONS_EXECUTING: u32 = 0x01;
pub const TRIG_FLAG_PRESERVED: u32 = 0x04;
pub const TRIG_FLAG_DISABLED: u32 = 0x08;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Condition {
    pub location: u32,
    pub players: u32,
    pub quantity: u32,
    pub unit: u16,
    pub compare: u8,
    pub id: u8,
    pub kind: u8,
    pub flags: u8,
    pub next: u16,
}

impl Condition {
    /// Пустой слот (id 0): дальше условия не читаются.
    pub fn is_none(&self) -> bool {
        self.id == 0
    }
}

impl Record for Condition {
    const LAYOUT: &'static [Field] = &[
        Field::new("location", COND_OFF_LOCATION, 4, FieldKind::Unsigned),
        Field::new("players", COND_OFF_PLAYERS, 4, FieldKind::Unsigned),
        Field::new("quantity", COND_OFF_QUANTITY, 4, FieldKind::Unsigned),
        Field::new("unit", COND_OFF_UNIT, 2, FieldKind::Unsigned),
        Field::new("compare", COND_OFF_COMPARE, 1, FieldKind::Unsigned),
        Field::new("id", COND_OFF_ID, 1, FieldKind::Unsigned),
        Field::new("type", COND_OFF_TYPE, 1, FieldKind::Unsigned),
        Field::new("flags", COND_OFF_FLAGS, 1, FieldKind::Unsigned),
        Field::new("next", COND_OFF_NEXT, 2, FieldKind::Unsigned),
    ];

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_u32(&mut out[COND_OFF_LOCATION..COND_OFF_LOCATION + 4], self.location);
        LittleEndian::write_u32(&mut out[COND_OFF_PLAYERS..COND_OFF_PLAYERS + 4], self.players);
        LittleEndian::write_u32(&mut out[COND_OFF_QUANTITY..COND_OFF_QUANTITY + 4], self.quantity);
        LittleEndian::write_u16(&mut out[COND_OFF_UNIT..COND_OFF_UNIT + 2], self.unit);
        out[COND_OFF_COMPARE] = self.compare;
        out[COND_OFF_ID] = self.id;
        out[COND_OFF_TYPE] = self.kind;
        out[COND_OFF_FLAGS] = self.flags;
        LittleEndian::write_u16(&mut out[COND_OFF_NEXT..COND_OFF_NEXT + 2], self.next);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            location: LittleEndian::read_u32(&buf[COND_OFF_LOCATION..COND_OFF_LOCATION + 4]),
            players: LittleEndian::read_u32(&buf[COND_OFF_PLAYERS..COND_OFF_PLAYERS + 4]),
            quantity: LittleEndian::read_u32(&buf[COND_OFF_QUANTITY..COND_OFF_QUANTITY + 4]),
            unit: LittleEndian::read_u16(&buf[COND_OFF_UNIT..COND_OFF_UNIT + 2]),
            compare: buf[COND_OFF_COMPARE],
            id: buf[COND_OFF_ID],
            kind: buf[COND_OFF_TYPE],
            flags: buf[COND_OFF_FLAGS],
            next: LittleEndian::read_u16(&buf[COND_OFF_NEXT..COND_OFF_NEXT + 2]),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Action {
    pub location: u32,
    /// Индекс строки (STR), 0 — нет.
    pub text: i32,
    /// Индекс строки с путём к wav.
    pub wave: i32,
    pub time: u32,
    pub players: u32,
    pub param: u32,
    pub kind: u16,
    pub id: u8,
    pub param2: u8,
    pub flags: u16,
    pub next: u16,
}

impl Action {
    pub fn is_none(&self) -> bool {
        self.id == 0
    }
}

impl Record for Action {
    const LAYOUT: &'static [Field] = &[
        Field::new("location", ACT_OFF_LOCATION, 4, FieldKind::Unsigned),
        Field::new("text", ACT_OFF_TEXT, 4, FieldKind::Signed),
        Field::new("wave", ACT_OFF_WAVE, 4, FieldKind::Signed),
        Field::new("time", ACT_OFF_TIME, 4, FieldKind::Unsigned),
        Field::new("players", ACT_OFF_PLAYERS, 4, FieldKind::Unsigned),
        Field::new("param", ACT_OFF_PARAM, 4, FieldKind::Unsigned),
        Field::new("type", ACT_OFF_TYPE, 2, FieldKind::Unsigned),
        Field::new("id", ACT_OFF_ID, 1, FieldKind::Unsigned),
        Field::new("param2", ACT_OFF_PARAM2, 1, FieldKind::Unsigned),
        Field::new("flags", ACT_OFF_FLAGS, 2, FieldKind::Unsigned),
        Field::new("next", ACT_OFF_NEXT, 2, FieldKind::Unsigned),
    ];

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_u32(&mut out[ACT_OFF_LOCATION..ACT_OFF_LOCATION + 4], self.location);
        LittleEndian::write_i32(&mut out[ACT_OFF_TEXT..ACT_OFF_TEXT + 4], self.text);
        LittleEndian::write_i32(&mut out[ACT_OFF_WAVE..ACT_OFF_WAVE + 4], self.wave);
        LittleEndian::write_u32(&mut out[ACT_OFF_TIME..ACT_OFF_TIME + 4], self.time);
        LittleEndian::write_u32(&mut out[ACT_OFF_PLAYERS..ACT_OFF_PLAYERS + 4], self.players);
        LittleEndian::write_u32(&mut out[ACT_OFF_PARAM..ACT_OFF_PARAM + 4], self.param);
        LittleEndian::write_u16(&mut out[ACT_OFF_TYPE..ACT_OFF_TYPE + 2], self.kind);
        out[ACT_OFF_ID] = self.id;
        out[ACT_OFF_PARAM2] = self.param2;
        LittleEndian::write_u16(&mut out[ACT_OFF_FLAGS..ACT_OFF_FLAGS + 2], self.flags);
        LittleEndian::write_u16(&mut out[ACT_OFF_NEXT..ACT_OFF_NEXT + 2], self.next);
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            location: LittleEndian::read_u32(&buf[ACT_OFF_LOCATION..ACT_OFF_LOCATION + 4]),
            text: LittleEndian::read_i32(&buf[ACT_OFF_TEXT..ACT_OFF_TEXT + 4]),
            wave: LittleEndian::read_i32(&buf[ACT_OFF_WAVE..ACT_OFF_WAVE + 4]),
            time: LittleEndian::read_u32(&buf[ACT_OFF_TIME..ACT_OFF_TIME + 4]),
            players: LittleEndian::read_u32(&buf[ACT_OFF_PLAYERS..ACT_OFF_PLAYERS + 4]),
            param: LittleEndian::read_u32(&buf[ACT_OFF_PARAM..ACT_OFF_PARAM + 4]),
            kind: LittleEndian::read_u16(&buf[ACT_OFF_TYPE..ACT_OFF_TYPE + 2]),
            id: buf[ACT_OFF_ID],
            param2: buf[ACT_OFF_PARAM2],
            flags: LittleEndian::read_u16(&buf[ACT_OFF_FLAGS..ACT_OFF_FLAGS + 2]),
            next: LittleEndian::read_u16(&buf[ACT_OFF_NEXT..ACT_OFF_NEXT + 2]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub conditions: [Condition; TRIG_CONDITIONS],
    pub actions: [Action; TRIG_ACTIONS],
    pub flags: u32,
    /// Исполнять для игрока i, если players[i] != 0.
    pub players: [u8; TRIG_PLAYERS],
}

// [Action; 64] не получает Default из derive.
impl Default for Trigger {
    fn default() -> Self {
        Self {
            conditions: [Condition::default(); TRIG_CONDITIONS],
            actions: [Action::default(); TRIG_ACTIONS],
            flags: 0,
            players: [0; TRIG_PLAYERS],
        }
    }
}

impl Trigger {
    /// Заполненные условия (до первого пустого слота).
    pub fn active_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter().take_while(|c| !c.is_none())
    }

    /// Заполненные действия (до первого пустого слота).
    pub fn active_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().take_while(|a| !a.is_none())
    }

    pub fn runs_for(&self, player: usize) -> bool {
        self.players.get(player).is_some_and(|&p| p != 0)
    }
}

impl Record for Trigger {
    const LAYOUT: &'static [Field] = &[
        Field::new(
            "conditions",
            TRIG_OFF_CONDITIONS,
            TRIG_CONDITIONS * Condition::SIZE,
            FieldKind::Nested,
        ),
        Field::new(
            "actions",
            TRIG_OFF_ACTIONS,
            TRIG_ACTIONS * Action::SIZE,
            FieldKind::Nested,
        ),
        Field::new("flags", TRIG_OFF_FLAGS, 4, FieldKind::Unsigned),
        Field::new("players", TRIG_OFF_PLAYERS, TRIG_PLAYERS, FieldKind::Bytes),
    ];

    fn encode(&self, out: &mut [u8]) {
        for (i, c) in self.conditions.iter().enumerate() {
            let off = TRIG_OFF_CONDITIONS + i * Condition::SIZE;
            c.encode(&mut out[off..off + Condition::SIZE]);
        }
        for (i, a) in self.actions.iter().enumerate() {
            let off = TRIG_OFF_ACTIONS + i * Action::SIZE;
            a.encode(&mut out[off..off + Action::SIZE]);
        }
        LittleEndian::write_u32(&mut out[TRIG_OFF_FLAGS..TRIG_OFF_FLAGS + 4], self.flags);
        out[TRIG_OFF_PLAYERS..TRIG_OFF_PLAYERS + TRIG_PLAYERS].copy_from_slice(&self.players);
    }

    fn decode(buf: &[u8]) -> Self {
        let mut t = Trigger::default();
        for (i, c) in t.conditions.iter_mut().enumerate() {
            let off = TRIG_OFF_CONDITIONS + i * Condition::SIZE;
            *c = Condition::decode(&buf[off..off + Condition::SIZE]);
        }
        for (i, a) in t.actions.iter_mut().enumerate() {
            let off = TRIG_OFF_ACTIONS + i * Action::SIZE;
            *a = Action::decode(&buf[off..off + Action::SIZE]);
        }
        t.flags = LittleEndian::read_u32(&buf[TRIG_OFF_FLAGS..TRIG_OFF_FLAGS + 4]);
        t.players
            .copy_from_slice(&buf[TRIG_OFF_PLAYERS..TRIG_OFF_PLAYERS + TRIG_PLAYERS]);
        t
    }
}
