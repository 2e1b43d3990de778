//! Character encoding tables
//!
//! Two read-only tables translate symbols into register bytes:
//!
//! - [`SEGMENTS`]: 128 entries indexed by value, each an 8-bit segment
//!   pattern for a 7-segment digit. Hex digits `0x0`-`0xF` encode as `0`-`F`;
//!   ASCII digits, the letters that have a 7-segment shape (`A`-`F`, `H`, `L`,
//!   `P`, either case) and the punctuation `-`, `.`, `,`, `_` follow their
//!   ASCII codes. Every other entry is blank.
//! - 8x8 matrix glyphs for printable ASCII `!` to `~`, looked up through
//!   [`glyph`]. Each glyph is eight row bytes, bit 7 being the leftmost column.
//!
//! ## Segment Layout
//!
//! | Bit         | 7  | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
//! |-------------|----|---|---|---|---|---|---|---|
//! | **Segment** | DP | A | B | C | D | E | F | G |
//!
//! ## Example
//!
//! ```
//! use ledcontrol::font;
//!
//! // Digit 1 lights segments B and C
//! assert_eq!(font::segment(1), 0b0011_0000);
//! // Out-of-table values render blank
//! assert_eq!(font::segment(200), font::segment(b' '));
//!
//! let a = font::glyph('A').unwrap_or(&font::BLANK_GLYPH);
//! assert_eq!(a[0], 0x0E);
//! ```

/// Decimal point segment bit
pub const DECIMAL_POINT: u8 = 0x80;

/// Segment table index used for values outside `0..=127`
pub const BLANK_INDEX: u8 = 32;

/// An 8x8 glyph with every LED off
pub const BLANK_GLYPH: [u8; 8] = [0; 8];

/// First character with a matrix glyph (`!`)
const FIRST_GLYPH: char = '!';

/// 7-segment patterns indexed by value
pub static SEGMENTS: [u8; 128] = [
    0x7E, 0x30, 0x6D, 0x79, 0x33, 0x5B, 0x5F, 0x70,
    0x7F, 0x7B, 0x77, 0x1F, 0x0D, 0x3D, 0x4F, 0x47,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x80, 0x01, 0x80, 0x00,
    0x7E, 0x30, 0x6D, 0x79, 0x33, 0x5B, 0x5F, 0x70,
    0x7F, 0x7B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x77, 0x1F, 0x0D, 0x3D, 0x4F, 0x47, 0x00,
    0x37, 0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00,
    0x67, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08,
    0x00, 0x77, 0x1F, 0x0D, 0x3D, 0x4F, 0x47, 0x00,
    0x37, 0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00,
    0x67, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// 8x8 glyphs for `!` (index 0) through `~` (index 93)
static GLYPHS: [[u8; 8]; 94] = [
    [0x04, 0x04, 0x04, 0x04, 0x00, 0x00, 0x04, 0x00], // !
    [0x0A, 0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00], // "
    [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A, 0x00], // #
    [0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04, 0x00], // $
    [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03, 0x00], // %
    [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D, 0x00], // &
    [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02, 0x00], // (
    [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08, 0x00], // )
    [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00, 0x00], // *
    [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08, 0x00], // ,
    [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00], // .
    [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00, 0x00], // /
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E, 0x00], // 0
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E, 0x00], // 1
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F, 0x00], // 2
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E, 0x00], // 3
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02, 0x00], // 4
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E, 0x00], // 5
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E, 0x00], // 6
    [0x1F, 0x01, 0x02, 0x04, 0x04, 0x04, 0x04, 0x00], // 7
    [0x1E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E, 0x00], // 8
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C, 0x00], // 9
    [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00, 0x00], // :
    [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08, 0x00], // ;
    [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02, 0x00], // <
    [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00, 0x00], // =
    [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08, 0x00], // >
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04, 0x00], // ?
    [0x0E, 0x11, 0x01, 0x0D, 0x15, 0x15, 0x0E, 0x00], // @
    [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x00], // A
    [0x1E, 0x09, 0x09, 0x0E, 0x09, 0x09, 0x1E, 0x00], // B
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E, 0x00], // C
    [0x1E, 0x09, 0x09, 0x09, 0x09, 0x09, 0x1E, 0x00], // D
    [0x1F, 0x10, 0x10, 0x1F, 0x10, 0x10, 0x1F, 0x00], // E
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10, 0x00], // F
    [0x0E, 0x11, 0x10, 0x13, 0x11, 0x11, 0x0F, 0x00], // G
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11, 0x00], // H
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E, 0x00], // I
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C, 0x00], // J
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11, 0x00], // K
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F, 0x00], // L
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11, 0x00], // M
    [0x11, 0x19, 0x19, 0x15, 0x13, 0x13, 0x11, 0x00], // N
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E, 0x00], // O
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10, 0x00], // P
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x1D, 0x00], // Q
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11, 0x00], // R
    [0x0E, 0x11, 0x10, 0x0E, 0x01, 0x11, 0x0E, 0x00], // S
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x00], // T
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E, 0x00], // U
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04, 0x00], // V
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11, 0x00], // W
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11, 0x00], // X
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x00], // Y
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F, 0x00], // Z
    [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E, 0x00], // [
    [0x00, 0x10, 0x08, 0x04, 0x02, 0x01, 0x00, 0x00], // \
    [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E, 0x00], // ]
    [0x04, 0x0A, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F, 0x00], // _
    [0x10, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F, 0x00], // a
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E, 0x00], // b
    [0x00, 0x00, 0x0E, 0x11, 0x10, 0x11, 0x0E, 0x00], // c
    [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F, 0x00], // d
    [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E, 0x00], // e
    [0x02, 0x05, 0x04, 0x0E, 0x04, 0x04, 0x04, 0x00], // f
    [0x00, 0x0D, 0x13, 0x13, 0x0D, 0x01, 0x0E, 0x00], // g
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11, 0x00], // h
    [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E, 0x00], // i
    [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C, 0x00], // j
    [0x08, 0x08, 0x09, 0x0A, 0x0C, 0x0A, 0x09, 0x00], // k
    [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E, 0x00], // l
    [0x00, 0x00, 0x1A, 0x15, 0x15, 0x15, 0x15, 0x00], // m
    [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11, 0x00], // n
    [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E, 0x00], // o
    [0x00, 0x16, 0x19, 0x19, 0x16, 0x10, 0x10, 0x00], // p
    [0x00, 0x0D, 0x13, 0x13, 0x0D, 0x01, 0x01, 0x00], // q
    [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10, 0x00], // r
    [0x00, 0x00, 0x0F, 0x10, 0x1E, 0x01, 0x1F, 0x00], // s
    [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06, 0x00], // t
    [0x00, 0x00, 0x12, 0x12, 0x12, 0x12, 0x0D, 0x00], // u
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04, 0x00], // v
    [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A, 0x00], // w
    [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x00], // x
    [0x00, 0x00, 0x11, 0x11, 0x13, 0x0D, 0x01, 0x0E], // y
    [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F, 0x00], // z
    [0x02, 0x04, 0x04, 0x08, 0x04, 0x04, 0x02, 0x00], // {
    [0x04, 0x04, 0x04, 0x00, 0x04, 0x04, 0x04, 0x00], // |
    [0x08, 0x04, 0x04, 0x02, 0x04, 0x04, 0x08, 0x00], // }
    [0x08, 0x15, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00], // ~
];

/// Segment pattern for `value`
///
/// Values above 127 resolve to the blank entry rather than failing.
pub fn segment(value: u8) -> u8 {
    let index = if value > 127 { BLANK_INDEX } else { value };
    SEGMENTS[index as usize]
}

/// Segment pattern for a character code point
///
/// Code points outside the table (anything past ASCII) render blank.
pub fn segment_for_char(ch: char) -> u8 {
    u8::try_from(u32::from(ch)).map_or_else(|_| segment(BLANK_INDEX), segment)
}

/// Matrix glyph for `ch`
///
/// Space maps to [`BLANK_GLYPH`]. Returns `None` for characters without a
/// glyph (control characters, anything outside printable ASCII).
pub fn glyph(ch: char) -> Option<&'static [u8; 8]> {
    if ch == ' ' {
        return Some(&BLANK_GLYPH);
    }
    let offset = u32::from(ch).checked_sub(u32::from(FIRST_GLYPH))?;
    GLYPHS.get(offset as usize)
}
