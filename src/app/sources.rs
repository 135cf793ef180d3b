//! Event Sources — the only writers of the shared LED mode.
//!
//! | Source            | Context              | Mutation                 |
//! |-------------------|----------------------|--------------------------|
//! | [`IsrToggle`]     | GPIO ISR (falling)   | toggle, nothing else     |
//! | [`ToggleEndpoint`]| HTTP request handler | toggle, return new token |
//!
//! Neither variant debounces.  A bouncing contact may toggle several
//! times per physical press; consumers only ever see the settled value
//! at their next poll.

use crate::state::{Mode, StateReader, StateWriter};

/// Interrupt-context toggle.
///
/// Holds nothing but a [`StateWriter`], so the handler body cannot log,
/// allocate, lock or block.  Bind one to a `static` and call
/// [`fire`](Self::fire) from the zero-argument ISR trampoline.
#[derive(Clone, Copy)]
pub struct IsrToggle<'a> {
    writer: StateWriter<'a>,
}

impl<'a> IsrToggle<'a> {
    pub const fn new(writer: StateWriter<'a>) -> Self {
        Self { writer }
    }

    #[inline]
    pub fn fire(&self) {
        self.writer.toggle();
    }
}

/// Request-context toggle (`GET /toggle`).
#[derive(Clone, Copy)]
pub struct ToggleEndpoint<'a> {
    writer: StateWriter<'a>,
    reader: StateReader<'a>,
}

impl<'a> ToggleEndpoint<'a> {
    pub const fn new(writer: StateWriter<'a>, reader: StateReader<'a>) -> Self {
        Self { writer, reader }
    }

    /// Flip the mode and return the post-toggle token (`"On"`/`"Off"`).
    ///
    /// The returned token is the value this request wrote, even if another
    /// writer lands immediately afterwards.
    pub fn toggle(&self) -> &'static str {
        self.writer.toggle().as_str()
    }

    /// Current mode, without mutating it.
    pub fn current(&self) -> Mode {
        self.reader.read()
    }
}
