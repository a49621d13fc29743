use crate::core::Waveform;
use crate::error::{AudioError, AudioResult};

/// Overlap-and-discard windowing over a waveform.
///
/// Windows carry `boundary_frames` of extra context on each interior edge
/// so a transform applied per window sees past the cut point; the context's
/// transformed output is discarded by [`restore`](Segmenter::restore),
/// hiding edge discontinuities. The first window has no leading margin and
/// the last none trailing.
#[derive(Debug, Clone)]
pub struct Segmenter {
    /// Window size excluding margin, in frames
    segment_frames: usize,
    /// One-sided overlap margin, in frames
    boundary_frames: usize,
}

impl Segmenter {
    /// Create a segmenter. `segment_frames` must exceed `boundary_frames`;
    /// anything else is a caller bug, rejected up front.
    pub fn new(segment_frames: usize, boundary_frames: usize) -> AudioResult<Self> {
        if segment_frames <= boundary_frames {
            return Err(AudioError::SegmentationError(format!(
                "segment_frames ({segment_frames}) must exceed boundary_frames ({boundary_frames})"
            )));
        }
        Ok(Segmenter {
            segment_frames,
            boundary_frames,
        })
    }

    /// Window size excluding margin
    pub fn segment_frames(&self) -> usize {
        self.segment_frames
    }

    /// One-sided overlap margin
    pub fn boundary_frames(&self) -> usize {
        self.boundary_frames
    }

    /// Split a waveform into overlapping windows.
    ///
    /// A moving cursor carves `[0, segment+boundary)` first, then
    /// `[cursor - 2*boundary, cursor + segment)` — backing up once to
    /// restore the previous window's trailing margin and once more for this
    /// window's leading margin. The final window's end is clamped to the
    /// input length. An input shorter than `segment + boundary` yields a
    /// single window equal to the whole input.
    pub fn segment(&self, waveform: &Waveform) -> AudioResult<Vec<Waveform>> {
        let total = waveform.frames();
        let mut windows = Vec::new();
        let mut cursor = 0usize;

        loop {
            let (start, end) = if cursor == 0 {
                (0, self.segment_frames + self.boundary_frames)
            } else {
                (
                    cursor - 2 * self.boundary_frames,
                    cursor + self.segment_frames,
                )
            };
            let end = end.min(total);

            // Any clamped non-first window spans at least 2*boundary + 1
            // frames, so restore never underflows.
            debug_assert!(start == 0 || end - start > 2 * self.boundary_frames);

            cursor = end;
            windows.push(waveform.sub_frames(start, end)?);
            if cursor >= total {
                break;
            }
        }

        Ok(windows)
    }

    /// Trim the overlap margin back out of a transformed window.
    ///
    /// `leading`/`trailing` say which sides carried a margin: the first
    /// window of a sequence has no leading margin, the last no trailing.
    pub fn restore(
        &self,
        waveform: &Waveform,
        leading: bool,
        trailing: bool,
    ) -> AudioResult<Waveform> {
        let mut start = 0;
        let mut end = waveform.frames();
        if leading {
            start += self.boundary_frames;
        }
        if trailing {
            end -= self.boundary_frames;
        }
        waveform.sub_frames(start, end)
    }
}

/// Trailing-margin carry for streaming overlap-and-discard.
///
/// When windows come from an incremental decoder instead of one in-memory
/// waveform, the margin for each chunk's leading edge is the tail of the
/// previous *untransformed* chunk. The carry is prepended before the
/// transform, its transformed prefix stripped after, and then re-armed from
/// the current chunk.
#[derive(Debug)]
pub struct MarginCarry {
    boundary_frames: usize,
    carry: Option<Waveform>,
}

impl MarginCarry {
    /// Create an empty carry (first chunk has no leading margin)
    pub fn new(boundary_frames: usize) -> Self {
        MarginCarry {
            boundary_frames,
            carry: None,
        }
    }

    /// Frames currently carried
    pub fn len(&self) -> usize {
        self.carry.as_ref().map_or(0, Waveform::frames)
    }

    /// Whether no margin is carried yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prepend the carried margin to a freshly decoded chunk.
    pub fn extend(&self, chunk: &Waveform) -> AudioResult<Waveform> {
        match &self.carry {
            Some(carry) => carry.concat(chunk),
            None => Ok(chunk.clone()),
        }
    }

    /// Strip the carry-length prefix from a transformed chunk.
    pub fn strip(&self, transformed: Waveform) -> AudioResult<Waveform> {
        transformed.sub_end_frames(self.len())
    }

    /// Re-arm the carry from the tail of the current untransformed chunk.
    pub fn advance(&mut self, chunk: &Waveform) -> AudioResult<()> {
        let tail_start = chunk.frames().saturating_sub(self.boundary_frames);
        self.carry = Some(chunk.sub_end_frames(tail_start)?);
        Ok(())
    }
}
