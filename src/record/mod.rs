//! record — типизированные записи фиксированного размера поверх PagedBuffer.
//!
//! - layout.rs  — явная раскладка полей (offset/width/kind), размер записи.
//! - overlay.rs — RecordOverlay: буфер как плотная последовательность записей.
//! - chain.rs   — RecordChain: несколько overlay как одна логическая последовательность.

pub mod layout;
pub mod overlay;
pub mod chain;

pub use layout::{check_layout, layout_size, Field, FieldKind};
pub use overlay::{RecordIter, RecordOverlay};
pub use chain::RecordChain;

/// Запись фиксированного размера с явной little-endian раскладкой.
///
/// `encode` получает срез ровно `SIZE` байт (обнулённый), `decode` — срез ровно `SIZE` байт
/// (недостающий хвост частичной записи дополнен нулями).
pub trait Record: Sized {
    /// Поля в порядке объявления.
    const LAYOUT: &'static [Field];
    /// Ширина записи в байтах (по умолчанию — из раскладки).
    const SIZE: usize = layout_size(Self::LAYOUT);

    fn encode(&self, out: &mut [u8]);
    fn decode(buf: &[u8]) -> Self;

    /// Закодировать в новый Vec длины SIZE.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        self.encode(&mut out);
        out
    }
}

/// Проверка, что encode/decode записи кладут каждое поле ровно туда, куда указывает LAYOUT:
/// байты одного поля (остальное нули) должны декодироваться во что-то ненулевое и
/// закодироваться обратно в те же байты.
#[cfg(test)]
pub(crate) fn assert_codec_follows_layout<R: Record + PartialEq + std::fmt::Debug>() {
    check_layout(R::LAYOUT, R::SIZE).unwrap();
    let zero = R::decode(&vec![0u8; R::SIZE]);
    assert_eq!(zero.to_bytes(), vec![0u8; R::SIZE]);

    for f in R::LAYOUT {
        let mut raw = vec![0u8; R::SIZE];
        for (k, b) in raw[f.offset..f.end()].iter_mut().enumerate() {
            *b = (k % 255 + 1) as u8;
        }
        let rec = R::decode(&raw);
        assert_ne!(rec, zero, "field '{}' at {} is not decoded", f.name, f.offset);
        assert_eq!(
            rec.to_bytes(),
            raw,
            "field '{}' at {}..{} is not encoded back in place",
            f.name,
            f.offset,
            f.end()
        );
    }

    // все поля сразу
    let full: Vec<u8> = (0..R::SIZE).map(|i| (i % 253 + 1) as u8).collect();
    assert_eq!(R::decode(&full).to_bytes(), full);
}
