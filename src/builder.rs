//! Construction of mapping tables from the raw `mappings` string.
use crate::errors::{Error, Result};
use crate::types::{Line, MappingTable, OriginalPosition, Segment};
use crate::vlq::parse_vlq_segment;

/// The delta accumulators that carry over from line to line.
///
/// Every field starts out unset; the first occurrence of a field is taken
/// as an absolute value and later occurrences are added onto it.  The
/// generated column is not part of this state since it restarts on every
/// line.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub struct DeltaState {
    source_index: Option<i64>,
    original_line: Option<i64>,
    original_column: Option<i64>,
    name_index: Option<i64>,
}

impl DeltaState {
    /// Creates a state with all accumulators unset.
    pub fn new() -> DeltaState {
        DeltaState::default()
    }
}

fn accumulate(prev: &mut Option<i64>, delta: i64) -> Result<i64> {
    let value = match *prev {
        Some(prev) => prev.checked_add(delta).ok_or(Error::VlqOverflow)?,
        None => delta,
    };
    *prev = Some(value);
    Ok(value)
}

fn to_u32(value: i64, field: &'static str) -> Result<u32> {
    if value < 0 {
        return Err(Error::NegativeValue(field));
    }
    u32::try_from(value).map_err(|_| Error::VlqOverflow)
}

fn decode_segment(
    nums: &[i64],
    prev_col: Option<u32>,
    state: &mut DeltaState,
) -> Result<Segment> {
    let col = match prev_col {
        Some(prev) => i64::from(prev) + nums[0],
        None => nums[0],
    };
    let mut segment = Segment::generated_only(to_u32(col, "generated column")?);

    if nums.len() >= 4 {
        let source_index = accumulate(&mut state.source_index, nums[1])?;
        let line = accumulate(&mut state.original_line, nums[2])?;
        let column = accumulate(&mut state.original_column, nums[3])?;
        let name_index = if nums.len() == 5 {
            Some(to_u32(accumulate(&mut state.name_index, nums[4])?, "name index")?)
        } else {
            None
        };
        segment.original = Some(OriginalPosition {
            source_index: to_u32(source_index, "source index")?,
            line: to_u32(line, "original line")?
                .checked_add(1)
                .ok_or(Error::VlqOverflow)?,
            column: to_u32(column, "original column")?,
            name_index,
        });
    }

    Ok(segment)
}

/// Decodes one `;` separated group of `mappings` into a line record.
///
/// `state` is advanced by every segment that carries a source mapping.
/// Fields decoding to no values are skipped.
pub fn decode_line(line_number: u32, group: &str, state: &mut DeltaState) -> Result<Line> {
    let mut segments: Vec<Segment> = vec![];

    for (idx, field) in group.split(',').enumerate() {
        let decoded = parse_vlq_segment(field).and_then(|nums| {
            if nums.is_empty() {
                return Ok(None);
            }
            let prev_col = segments.last().map(|seg| seg.generated_column);
            decode_segment(&nums, prev_col, state).map(Some)
        });
        match decoded {
            Ok(Some(segment)) => segments.push(segment),
            Ok(None) => {}
            Err(err) => {
                return Err(Error::MalformedMapping {
                    line: line_number,
                    segment: idx,
                    cause: Box::new(err),
                })
            }
        }
    }

    Ok(Line::new(line_number, segments))
}

/// Builds the mapping table for a raw `mappings` string.
///
/// The build aborts on the first malformed field.
pub fn build_table(mappings: &str) -> Result<MappingTable> {
    let mut state = DeltaState::new();
    let lines = mappings
        .split(';')
        .enumerate()
        .map(|(idx, group)| decode_line(idx as u32 + 1, group, &mut state))
        .collect::<Result<Vec<_>>>()?;
    Ok(MappingTable::from_lines(lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_threaded_between_lines() {
        let mut state = DeltaState::new();
        let first = decode_line(1, "AAAA,EAAE", &mut state).unwrap();
        let second = decode_line(2, "AACA", &mut state).unwrap();

        assert_eq!(first.segments()[1].generated_column, 2);
        assert_eq!(first.segments()[1].original.unwrap().column, 2);

        // the column restarts per line, the original column does not
        let seg = second.segments()[0];
        assert_eq!(seg.generated_column, 0);
        let orig = seg.original.unwrap();
        assert_eq!((orig.line, orig.column), (2, 2));
    }

    #[test]
    fn test_fresh_state_is_unset() {
        let mut state = DeltaState::new();
        let line = decode_line(1, "EAEE", &mut state).unwrap();
        let orig = line.segments()[0].original.unwrap();
        assert_eq!(orig.source_index, 0);
        assert_eq!(orig.line, 3);
        assert_eq!(orig.column, 2);
        assert_ne!(state, DeltaState::new());
    }

    #[test]
    fn test_column_only_segments_keep_state() {
        let mut state = DeltaState::new();
        decode_line(1, "AAAA", &mut state).unwrap();
        let before = state;
        let line = decode_line(2, "C,EC", &mut state).unwrap();
        assert_eq!(state, before);
        assert_eq!(line.segments()[0], Segment::generated_only(1));
        // three values do not carry a source mapping either
        assert_eq!(line.segments()[1], Segment::generated_only(3));
    }
}
