// 14-segment display font.
//
// The front panel uses two 14-segment digits. Segments are named after
// their position:
//
//  --a----
// |\  |  /|
// f g h j b
// |  \|/  |
//  -p- -k-
// |  /|\  |
// e n m l c
// |/  |  \|
//  ----d--
//
// Each glyph is written as a string of segment letters and parsed once into
// a 256-entry font indexed by codepoint. Codepoints 0x80 and up hold
// firmware-specific glyphs (arrows, waveforms, spinners, filter icons, the
// pi and square-root signs used in FM ratio names). Unlisted codepoints
// render blank.

use crate::error::{Result, TableError};
use crate::table::{LookupTable, TableWidth};

/// One of the 14 display segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    K,
    L,
    M,
    N,
    P,
}

impl Segment {
    pub const ALL: [Segment; 14] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
        Segment::H,
        Segment::J,
        Segment::K,
        Segment::L,
        Segment::M,
        Segment::N,
        Segment::P,
    ];

    /// Bit driven by this segment in the display shift register.
    pub fn mask(self) -> u16 {
        match self {
            Segment::A => 0x8000,
            Segment::B => 0x4000,
            Segment::C => 0x2000,
            Segment::D => 0x1000,
            Segment::E => 0x0800,
            Segment::F => 0x0400,
            Segment::G => 0x0200,
            Segment::H => 0x0100,
            Segment::J => 0x0080,
            Segment::K => 0x0040,
            Segment::L => 0x0020,
            Segment::M => 0x0010,
            Segment::N => 0x0008,
            Segment::P => 0x0004,
        }
    }

    pub fn from_letter(letter: char) -> Option<Segment> {
        Segment::ALL
            .into_iter()
            .find(|s| s.letter() == letter)
    }

    pub fn letter(self) -> char {
        match self {
            Segment::A => 'a',
            Segment::B => 'b',
            Segment::C => 'c',
            Segment::D => 'd',
            Segment::E => 'e',
            Segment::F => 'f',
            Segment::G => 'g',
            Segment::H => 'h',
            Segment::J => 'j',
            Segment::K => 'k',
            Segment::L => 'l',
            Segment::M => 'm',
            Segment::N => 'n',
            Segment::P => 'p',
        }
    }
}

/// A set of lit segments. Stored directly as the display mask, so insertion
/// order and repeated segments have no effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SegmentSet(u16);

impl SegmentSet {
    pub const EMPTY: SegmentSet = SegmentSet(0);

    pub fn insert(&mut self, segment: Segment) {
        self.0 |= segment.mask();
    }

    pub fn contains(self, segment: Segment) -> bool {
        self.0 & segment.mask() != 0
    }

    pub fn mask(self) -> u16 {
        self.0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parse a string of segment letters. `codepoint` is only used for the
    /// error report.
    pub fn parse(codepoint: u8, letters: &str) -> Result<SegmentSet> {
        let mut set = SegmentSet::EMPTY;
        for letter in letters.chars() {
            let segment = Segment::from_letter(letter)
                .ok_or(TableError::UnknownSegment { codepoint, segment: letter })?;
            set.insert(segment);
        }
        Ok(set)
    }
}

impl FromIterator<Segment> for SegmentSet {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut set = SegmentSet::EMPTY;
        for segment in iter {
            set.insert(segment);
        }
        set
    }
}

/// Glyph definitions as (codepoint, segment letters).
const GLYPHS: &[(u8, &str)] = &[
    (b'A', "afepkbc"),
    (b'B', "adhmbck"),
    (b'C', "afed"),
    (b'D', "adhmbc"),
    (b'E', "afedkp"),
    (b'F', "afepk"),
    (b'G', "afedck"),
    (b'H', "febcpk"),
    (b'I', "adhm"),
    (b'J', "bcde"),
    (b'K', "efpjl"),
    (b'L', "def"),
    (b'M', "efgjbc"),
    (b'N', "efglcb"),
    (b'O', "abcdef"),
    (b'P', "abpkef"),
    (b'Q', "abcdefl"),
    (b'R', "abpkefl"),
    (b'S', "afpkcd"),
    (b'T', "ahm"),
    (b'U', "bcdef"),
    (b'V', "fenj"),
    (b'W', "fenlcb"),
    (b'X', "gjln"),
    (b'Y', "gjm"),
    (b'Z', "ajnd"),
    (b'a', "abpkecd"),
    (b'b', "fedlp"),
    (b'c', "pked"),
    (b'd', "bcdnk"),
    (b'e', "pkbafed"),
    (b'f', "afpe"),
    (b'g', "agkbcd"),
    (b'h', "fpkec"),
    (b'i', "mpkd"),
    (b'j', "kcd"),
    (b'k', "hmjl"),
    (b'l', "jm"),
    (b'm', "epkmc"),
    (b'n', "mkc"),
    (b'o', "pkecd"),
    (b'p', "afpje"),
    (b'q', "afpkbl"),
    (b'r', "mk"),
    (b's', "kld"),
    (b't', "fedp"),
    (b'u', "edc"),
    (b'v', "en"),
    (b'w', "enlc"),
    (b'x', "gnjl"),
    (b'y', "gkbcd"),
    (b'z', "pnd"),
    (b'0', "abcdefjn"),
    (b'1', "bcj"),
    (b'2', "abknd"),
    (b'3', "abcdk"),
    (b'4', "fpkbc"),
    (b'5', "afpld"),
    (b'6', "afpkcde"),
    (b'7', "ajm"),
    (b'8', "abcdefpk"),
    (b'9', "abcpkfd"),
    (b'!', "hm"),
    (b'"', "fh"),
    (b'#', "pkdhmbc"),
    (b'$', "afpkcdhm"),
    (b'%', "jnfc"),
    (b'&', "aghpeld"),
    (b'\'', "h"),
    (b'(', "afed"),
    (b')', "abcd"),
    (b'*', "ghjmnlpk"),
    (b'+', "hmpk"),
    (b',', "n"),
    (b'-', "pk"),
    (b'.', "m"),
    (b'/', "jn"),
    (b':', "hm"),
    (b';', "hn"),
    (b'<', "jl"),
    (b'>', "gn"),
    (b'?', "fabkm"),
    (b'=', "pkd"),
    (b'@', "kmcbafed"),
    (b'[', "afed"),
    (b']', "abcd"),
    (b'\\', "gl"),
    (b'^', "nl"),
    (b'_', "d"),
    (b'`', "g"),
    (b'{', "pgnad"),
    (b'|', "hm"),
    (b'}', "ajldk"),
    (b'~', "pk"),
    // Edge markers: left, right, down, up.
    (0x80, "jlbc"),
    (0x81, "efgn"),
    (0x82, "agj"),
    (0x83, "dnlm"),
    // Arrows: left, right, down, up.
    (0x84, "jkl"),
    (0x85, "gpn"),
    (0x86, "ghj"),
    (0x87, "nml"),
    // Waveforms: saw, centered saw, small saw, triangle, square, small
    // square, pulse, ADSR.
    (0x88, "efgl"),
    (0x89, "pjb"),
    (0x8A, "ml"),
    (0x8B, "nl"),
    (0x8C, "efabc"),
    (0x8D, "epkc"),
    (0x8E, "dhm"),
    (0x8F, "efgkc"),
    // Spinner, frame plus one rotating inner segment.
    (0x90, "abcdefn"),
    (0x91, "abcdefp"),
    (0x92, "abcdefg"),
    (0x93, "abcdefh"),
    (0x94, "abcdefj"),
    (0x95, "abcdefk"),
    (0x96, "abcdefl"),
    (0x97, "abcdefm"),
    // Spinner, rotating outer arc.
    (0x98, "ab"),
    (0x99, "abc"),
    (0x9A, "bcd"),
    (0x9B, "cde"),
    (0x9C, "de"),
    (0x9D, "def"),
    (0x9E, "efa"),
    (0x9F, "fab"),
    // Filter responses: low pass, high pass, notch.
    (0xA0, "pl"),
    (0xA1, "nk"),
    (0xA2, "pmk"),
    // CZ phase-distortion waveforms: the CZ hook over each filter shape.
    (0xB0, "afpkjpl"),
    (0xB1, "afpkjdnlm"),
    (0xB2, "afpkjnl"),
    (0xB3, "afpkjnk"),
    (0xC0, "plcb"), // sqrt
    (0xC1, "fhak"), // pi
    (0xFF, "abcdefghjklmnp"),
];

/// Codepoint of the pi glyph.
pub const PI_GLYPH: u8 = 0xC1;

/// The parsed font: one segment set per codepoint.
#[derive(Debug, Clone)]
pub struct SegmentFont {
    glyphs: [SegmentSet; 256],
}

impl SegmentFont {
    /// Parse the built-in glyph table.
    pub fn new() -> Result<Self> {
        Self::from_glyphs(GLYPHS)
    }

    /// Parse an arbitrary glyph table. Later definitions of the same
    /// codepoint replace earlier ones.
    pub fn from_glyphs(glyphs: &[(u8, &str)]) -> Result<Self> {
        let mut font = SegmentFont {
            glyphs: [SegmentSet::EMPTY; 256],
        };
        for &(codepoint, letters) in glyphs {
            font.glyphs[codepoint as usize] = SegmentSet::parse(codepoint, letters)?;
        }
        Ok(font)
    }

    pub fn glyph(&self, codepoint: u8) -> SegmentSet {
        self.glyphs[codepoint as usize]
    }

    /// Display mask for a codepoint; 0 for blank glyphs.
    pub fn encode(&self, codepoint: u8) -> u16 {
        self.glyph(codepoint).mask()
    }

    /// The dense `characters` table, index = codepoint.
    pub fn table(&self) -> Result<LookupTable> {
        LookupTable::integers(
            "characters",
            TableWidth::U16,
            self.glyphs.iter().map(|g| g.mask() as i64),
        )
    }
}
