/*
Pattern Store
=============

The grid the editor paints and the transport plays:

    pattern 0..P   ┐
      track 0..T   │  each cell: Option<Note>
        step 0..S  ┘

A cell is either empty (the step is silent) or holds a complete `Note`, so a
half-filled note cannot exist. The grid size is fixed when the store is made
(canonically 8 patterns × 4 tracks × 16 steps) and every access is bounds
checked against it.

Patterns live for the whole session in memory; nothing is written to disk.
*/

use crate::{
    error::{IndexAxis, SequencerError},
    voice::note::Note,
};

pub const DEFAULT_PATTERNS: usize = 8;
pub const DEFAULT_TRACKS: usize = 4;
pub const DEFAULT_STEPS: usize = 16;

/// One pattern: a tracks × steps grid of optional notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    tracks: usize,
    steps: usize,
    cells: Vec<Option<Note>>, // row-major: track * steps + step
}

impl Pattern {
    pub fn new(tracks: usize, steps: usize) -> Self {
        Self {
            tracks,
            steps,
            cells: vec![None; tracks * steps],
        }
    }

    pub fn tracks(&self) -> usize {
        self.tracks
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn get(&self, track: usize, step: usize) -> Result<Option<&Note>, SequencerError> {
        let index = self.index(track, step)?;
        Ok(self.cells[index].as_ref())
    }

    pub fn get_mut(&mut self, track: usize, step: usize) -> Result<Option<&mut Note>, SequencerError> {
        let index = self.index(track, step)?;
        Ok(self.cells[index].as_mut())
    }

    pub fn set(&mut self, track: usize, step: usize, note: Option<Note>) -> Result<(), SequencerError> {
        let index = self.index(track, step)?;
        self.cells[index] = note;
        Ok(())
    }

    /// Every track's note at `step`, as (track, note) pairs.
    pub fn notes_at_step(&self, step: usize) -> impl Iterator<Item = (usize, &Note)> + '_ {
        (0..self.tracks).filter_map(move |track| {
            self.cells
                .get(track * self.steps + step)
                .and_then(Option::as_ref)
                .filter(|_| step < self.steps)
                .map(|note| (track, note))
        })
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    fn index(&self, track: usize, step: usize) -> Result<usize, SequencerError> {
        SequencerError::check_index(IndexAxis::Track, track, self.tracks)?;
        SequencerError::check_index(IndexAxis::Step, step, self.steps)?;
        Ok(track * self.steps + step)
    }
}

/// Fixed set of patterns sharing one grid size.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternStore {
    patterns: Vec<Pattern>,
}

impl PatternStore {
    pub fn new(patterns: usize, tracks: usize, steps: usize) -> Self {
        Self {
            patterns: (0..patterns).map(|_| Pattern::new(tracks, steps)).collect(),
        }
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn tracks(&self) -> usize {
        self.patterns.first().map_or(0, Pattern::tracks)
    }

    pub fn steps(&self) -> usize {
        self.patterns.first().map_or(0, Pattern::steps)
    }

    pub fn pattern(&self, pattern: usize) -> Result<&Pattern, SequencerError> {
        SequencerError::check_index(IndexAxis::Pattern, pattern, self.patterns.len())?;
        Ok(&self.patterns[pattern])
    }

    pub fn pattern_mut(&mut self, pattern: usize) -> Result<&mut Pattern, SequencerError> {
        SequencerError::check_index(IndexAxis::Pattern, pattern, self.patterns.len())?;
        Ok(&mut self.patterns[pattern])
    }

    pub fn get_note(
        &self,
        pattern: usize,
        track: usize,
        step: usize,
    ) -> Result<Option<&Note>, SequencerError> {
        self.pattern(pattern)?.get(track, step)
    }

    pub fn note_mut(
        &mut self,
        pattern: usize,
        track: usize,
        step: usize,
    ) -> Result<Option<&mut Note>, SequencerError> {
        self.pattern_mut(pattern)?.get_mut(track, step)
    }

    pub fn set_note(
        &mut self,
        pattern: usize,
        track: usize,
        step: usize,
        note: Option<Note>,
    ) -> Result<(), SequencerError> {
        self.pattern_mut(pattern)?.set(track, step, note)
    }

    /// Reset every cell of one pattern to empty.
    pub fn clear_pattern(&mut self, pattern: usize) -> Result<(), SequencerError> {
        self.pattern_mut(pattern)?.clear();
        Ok(())
    }

    /// Overwrite pattern `to` with a copy of pattern `from`.
    pub fn copy_pattern(&mut self, from: usize, to: usize) -> Result<(), SequencerError> {
        let source = self.pattern(from)?.clone();
        *self.pattern_mut(to)? = source;
        Ok(())
    }

    /// Steps of `track` that hold a note.
    pub fn active_steps(&self, pattern: usize, track: usize) -> Result<Vec<usize>, SequencerError> {
        let pattern = self.pattern(pattern)?;
        SequencerError::check_index(IndexAxis::Track, track, pattern.tracks())?;

        Ok((0..pattern.steps())
            .filter(|&step| matches!(pattern.get(track, step), Ok(Some(_))))
            .collect())
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS, DEFAULT_TRACKS, DEFAULT_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::note::Waveform;

    fn note(freq: f32) -> Note {
        Note {
            freq,
            ..Note::default()
        }
    }

    #[test]
    fn empty_store_has_no_notes() {
        let store = PatternStore::default();
        assert_eq!(store.pattern_count(), 8);
        assert_eq!(store.tracks(), 4);
        assert_eq!(store.steps(), 16);
        assert_eq!(store.get_note(7, 3, 15).unwrap(), None);
    }

    #[test]
    fn set_then_get_round_trips_one_cell() {
        let mut store = PatternStore::default();
        store.set_note(2, 1, 5, Some(note(330.0))).unwrap();

        assert_eq!(store.get_note(2, 1, 5).unwrap().map(|n| n.freq), Some(330.0));
        assert_eq!(store.get_note(2, 1, 6).unwrap(), None);
        assert_eq!(store.get_note(3, 1, 5).unwrap(), None);

        store.set_note(2, 1, 5, None).unwrap();
        assert_eq!(store.get_note(2, 1, 5).unwrap(), None);
    }

    #[test]
    fn out_of_range_names_the_axis() {
        let mut store = PatternStore::default();
        assert_eq!(
            store.get_note(8, 0, 0).unwrap_err(),
            SequencerError::IndexOutOfRange {
                axis: IndexAxis::Pattern,
                index: 8,
                len: 8
            }
        );
        assert!(matches!(
            store.set_note(0, 4, 0, None),
            Err(SequencerError::IndexOutOfRange {
                axis: IndexAxis::Track,
                ..
            })
        ));
        assert!(matches!(
            store.get_note(0, 0, 16),
            Err(SequencerError::IndexOutOfRange {
                axis: IndexAxis::Step,
                ..
            })
        ));
    }

    #[test]
    fn note_mut_edits_in_place() {
        let mut store = PatternStore::default();
        store.set_note(0, 0, 0, Some(note(220.0))).unwrap();

        if let Some(n) = store.note_mut(0, 0, 0).unwrap() {
            n.osc = Waveform::Noise;
        }
        assert_eq!(store.get_note(0, 0, 0).unwrap().map(|n| n.osc), Some(Waveform::Noise));
        assert!(store.note_mut(0, 0, 1).unwrap().is_none());
    }

    #[test]
    fn copy_and_clear_patterns() {
        let mut store = PatternStore::default();
        store.set_note(0, 0, 0, Some(note(110.0))).unwrap();
        store.set_note(0, 3, 12, Some(note(880.0))).unwrap();

        store.copy_pattern(0, 5).unwrap();
        assert_eq!(store.pattern(5).unwrap(), store.pattern(0).unwrap());

        store.clear_pattern(0).unwrap();
        assert!(store.pattern(0).unwrap().is_empty());
        assert!(!store.pattern(5).unwrap().is_empty());
    }

    #[test]
    fn active_steps_lists_filled_cells() {
        let mut store = PatternStore::default();
        for step in [0, 4, 8, 12] {
            store.set_note(1, 2, step, Some(note(440.0))).unwrap();
        }
        assert_eq!(store.active_steps(1, 2).unwrap(), vec![0, 4, 8, 12]);
        assert!(store.active_steps(1, 0).unwrap().is_empty());
    }

    #[test]
    fn notes_at_step_walks_tracks() {
        let mut pattern = Pattern::new(4, 16);
        pattern.set(0, 3, Some(note(100.0))).unwrap();
        pattern.set(2, 3, Some(note(300.0))).unwrap();

        let tracks: Vec<usize> = pattern.notes_at_step(3).map(|(track, _)| track).collect();
        assert_eq!(tracks, vec![0, 2]);
        assert_eq!(pattern.notes_at_step(16).count(), 0);
    }
}
