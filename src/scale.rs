//! Musical scales
//!
//! Maps a scale name such as `"C4 major"` and a 1-indexed degree to a note
//! name such as `"E4"`. Degrees past the end of the scale continue into
//! higher octaves, so arc `i` can always take degree `i + 1`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("empty scale name")]
    Empty,
    #[error("invalid tonic `{0}`")]
    InvalidTonic(String),
    #[error("unknown scale type `{0}`")]
    UnknownType(String),
}

/// Scale types (semitone offsets from the tonic within one octave)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    Major,
    Minor,
    HarmonicMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    MajorPentatonic,
    MinorPentatonic,
    Chromatic,
}

impl ScaleKind {
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ScaleKind::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleKind::Minor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleKind::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleKind::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            ScaleKind::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            ScaleKind::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            ScaleKind::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            ScaleKind::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            ScaleKind::MajorPentatonic => &[0, 2, 4, 7, 9],
            ScaleKind::MinorPentatonic => &[0, 3, 5, 7, 10],
            ScaleKind::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "major" | "ionian" => Some(ScaleKind::Major),
            "minor" | "aeolian" | "natural minor" => Some(ScaleKind::Minor),
            "harmonic minor" => Some(ScaleKind::HarmonicMinor),
            "dorian" => Some(ScaleKind::Dorian),
            "phrygian" => Some(ScaleKind::Phrygian),
            "lydian" => Some(ScaleKind::Lydian),
            "mixolydian" => Some(ScaleKind::Mixolydian),
            "locrian" => Some(ScaleKind::Locrian),
            "major pentatonic" | "pentatonic" => Some(ScaleKind::MajorPentatonic),
            "minor pentatonic" => Some(ScaleKind::MinorPentatonic),
            "chromatic" => Some(ScaleKind::Chromatic),
            _ => None,
        }
    }
}

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Octave assumed when a tonic or note omits one
pub const DEFAULT_OCTAVE: i32 = 4;
/// Octaves a tonic may name (MIDI range)
pub const OCTAVE_RANGE: std::ops::RangeInclusive<i32> = -1..=9;

/// Parse a note like `"C#4"`, `"Bb"`, `"e5"` into a MIDI number.
///
/// Returns the MIDI number and whether the spelling used flats.
fn parse_pitch(s: &str) -> Option<(i32, bool)> {
    let mut chars = s.chars().peekable();
    let letter = chars.next()?.to_ascii_uppercase();
    let mut pitch_class: i32 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let mut flats = false;
    while let Some(&c) = chars.peek() {
        match c {
            '#' => pitch_class += 1,
            'b' => {
                pitch_class -= 1;
                flats = true;
            }
            _ => break,
        }
        chars.next();
    }

    let rest: String = chars.collect();
    let octave = if rest.is_empty() {
        DEFAULT_OCTAVE
    } else {
        rest.parse::<i32>().ok()?
    };
    if !OCTAVE_RANGE.contains(&octave) {
        return None;
    }

    Some(((octave + 1) * 12 + pitch_class, flats))
}

/// Spell a MIDI number as a note name with octave
fn midi_to_name(midi: i32, flats: bool) -> String {
    let names = if flats { &FLAT_NAMES } else { &SHARP_NAMES };
    let pc = midi.rem_euclid(12) as usize;
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", names[pc], octave)
}

/// MIDI number for a note name
pub fn note_to_midi(note: &str) -> Option<i32> {
    parse_pitch(note.trim()).map(|(midi, _)| midi)
}

/// Equal-tempered frequency (A4 = 440 Hz) for a note name
pub fn note_frequency(note: &str) -> Option<f64> {
    note_to_midi(note).map(|midi| 440.0 * 2f64.powf((midi - 69) as f64 / 12.0))
}

/// A parsed scale: tonic plus interval pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    tonic: i32,
    flats: bool,
    kind: ScaleKind,
}

impl Scale {
    /// Parse `"<tonic>[octave] <type>"`, e.g. `"D3 dorian"`
    pub fn parse(name: &str) -> Result<Self, ScaleError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScaleError::Empty);
        }

        let (tonic, kind) = name.split_once(char::is_whitespace).unwrap_or((name, "major"));
        let (tonic, flats) =
            parse_pitch(tonic).ok_or_else(|| ScaleError::InvalidTonic(tonic.to_string()))?;

        let kind_name = kind.split_whitespace().collect::<Vec<_>>().join(" ");
        let kind = ScaleKind::from_str(&kind_name).ok_or(ScaleError::UnknownType(kind_name))?;

        Ok(Self { tonic, flats, kind })
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    /// Note name for a 1-indexed degree (None for degree 0)
    pub fn degree(&self, degree: u32) -> Option<String> {
        let index = degree.checked_sub(1)? as usize;
        let intervals = self.kind.intervals();
        let octave = i32::try_from(index / intervals.len()).ok()?;
        let step = intervals[index % intervals.len()] as i32;
        let midi = octave
            .checked_mul(12)?
            .checked_add(step)?
            .checked_add(self.tonic)?;
        Some(midi_to_name(midi, self.flats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_degrees() {
        let scale = Scale::parse("C4 major").unwrap();
        let notes: Vec<_> = (1..=8).filter_map(|d| scale.degree(d)).collect();
        assert_eq!(notes, ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]);
    }

    #[test]
    fn test_degree_zero_is_none() {
        let scale = Scale::parse("C4 major").unwrap();
        assert_eq!(scale.degree(0), None);
    }

    #[test]
    fn test_pentatonic_wraps_octaves() {
        let scale = Scale::parse("A3 minor pentatonic").unwrap();
        assert_eq!(scale.degree(1).as_deref(), Some("A3"));
        assert_eq!(scale.degree(5).as_deref(), Some("G4"));
        assert_eq!(scale.degree(6).as_deref(), Some("A4"));
        assert_eq!(scale.degree(11).as_deref(), Some("A5"));
    }

    #[test]
    fn test_flat_tonic_spells_flats() {
        let scale = Scale::parse("Bb3 major").unwrap();
        assert_eq!(scale.degree(1).as_deref(), Some("Bb3"));
        assert_eq!(scale.degree(4).as_deref(), Some("Eb4"));
    }

    #[test]
    fn test_tonic_without_octave() {
        let scale = Scale::parse("D dorian").unwrap();
        assert_eq!(scale.degree(1).as_deref(), Some("D4"));
        assert_eq!(scale.kind(), ScaleKind::Dorian);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Scale::parse("  "), Err(ScaleError::Empty));
        assert!(matches!(Scale::parse("H4 major"), Err(ScaleError::InvalidTonic(_))));
        assert!(matches!(Scale::parse("C4 mystery"), Err(ScaleError::UnknownType(_))));
    }

    #[test]
    fn test_octave_out_of_range_is_invalid_tonic() {
        assert!(matches!(
            Scale::parse("C999999999 major"),
            Err(ScaleError::InvalidTonic(_))
        ));
        assert!(matches!(Scale::parse("C10 major"), Err(ScaleError::InvalidTonic(_))));
        assert!(Scale::parse("C-1 major").is_ok());
        assert!(Scale::parse("G9 major").is_ok());
        assert_eq!(note_to_midi("C-2"), None);
    }

    #[test]
    fn test_huge_degree_does_not_overflow() {
        let scale = Scale::parse("C4 chromatic").unwrap();
        assert_eq!(scale.degree(u32::MAX), None);
        assert_eq!(scale.degree(25).as_deref(), Some("C6"));
        let scale = Scale::parse("G9 major pentatonic").unwrap();
        assert_eq!(scale.degree(1).as_deref(), Some("G9"));
    }

    #[test]
    fn test_note_frequency() {
        assert!((note_frequency("A4").unwrap() - 440.0).abs() < 1e-9);
        assert!((note_frequency("A5").unwrap() - 880.0).abs() < 1e-9);
        assert!((note_frequency("C4").unwrap() - 261.6256).abs() < 1e-3);
        assert_eq!(note_frequency("nope"), None);
    }
}
