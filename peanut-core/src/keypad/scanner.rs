//! Two-stage debounced matrix scanner
//!
//! A contact must be seen on two scans at least [`DEBOUNCE_MS`] apart before
//! it counts as pressed. A release is classified by how long the key was
//! held, measured from the first scan that saw it, not from the `Down`
//! event. Contacts that vanish before promotion are bounce and produce
//! nothing.

use heapless::Vec;

use crate::traits::KeyMatrix;

/// Minimum age of a contact before it is reported as pressed
pub const DEBOUNCE_MS: u32 = 40;

/// Hold time at or above which a release is a long press
pub const LONG_PRESS_MS: u32 = 600;

/// Row settle time used by matrix drivers
pub const SETTLE_US: u32 = 5;

/// Largest matrix the scanner tracks
pub const MAX_KEYS: usize = 32;

/// Most events a single call can return
pub const MAX_EVENTS: usize = 16;

/// Row and column of a switch in the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPosition {
    pub row: u8,
    pub col: u8,
}

impl KeyPosition {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// What happened to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    /// Contact survived debouncing
    Down,
    /// Released before the long-press threshold
    Tap,
    /// Released at or after the long-press threshold
    Long,
}

/// A debounced key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub position: KeyPosition,
    pub kind: PressKind,
    pub timestamp_ms: u32,
}

/// Debounce and long-press thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanTiming {
    pub debounce_ms: u32,
    pub long_press_ms: u32,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            long_press_ms: LONG_PRESS_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Idle,
    /// Seen, not yet confirmed
    Provisional { since: u32 },
    /// Confirmed; `since` is when it was first seen
    Pressed { since: u32 },
}

/// Debounced scanner over a [`KeyMatrix`]
pub struct KeyScanner<M> {
    matrix: M,
    timing: ScanTiming,
    contacts: [Contact; MAX_KEYS],
    last_scan_ms: Option<u32>,
}

impl<M: KeyMatrix> KeyScanner<M> {
    pub fn new(matrix: M, timing: ScanTiming) -> Self {
        Self {
            matrix,
            timing,
            contacts: [Contact::Idle; MAX_KEYS],
            last_scan_ms: None,
        }
    }

    pub fn timing(&self) -> ScanTiming {
        self.timing
    }

    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    /// Drive each row in turn and collect every contacted position
    pub fn scan(&mut self) -> Vec<KeyPosition, MAX_KEYS> {
        let mut contacted = Vec::new();
        let cols = self.matrix.cols();

        for row in 0..self.matrix.rows() {
            self.matrix.select_row(row);
            for col in 0..cols {
                if row * cols + col < MAX_KEYS && self.matrix.column_active(col) {
                    // Capacity equals the index bound checked above
                    let _ = contacted.push(KeyPosition::new(row as u8, col as u8));
                }
            }
        }
        self.matrix.release_rows();

        contacted
    }

    /// Scan and advance every key's debounce state
    ///
    /// Calls closer than half the debounce interval to the previous scan
    /// return nothing without touching the matrix. `Down` events come
    /// first, then releases, each in row-major order.
    pub fn get_events(&mut self, now_ms: u32) -> Vec<KeyEvent, MAX_EVENTS> {
        let mut events = Vec::new();

        if let Some(last) = self.last_scan_ms {
            if now_ms.wrapping_sub(last) < self.timing.debounce_ms / 2 {
                return events;
            }
        }
        self.last_scan_ms = Some(now_ms);

        let cols = self.matrix.cols().max(1);
        let mut seen = [false; MAX_KEYS];
        for pos in self.scan() {
            seen[usize::from(pos.row) * cols + usize::from(pos.col)] = true;
        }

        let mut releases: Vec<KeyEvent, MAX_EVENTS> = Vec::new();
        for (index, contact) in self.contacts.iter_mut().enumerate() {
            let position = KeyPosition::new((index / cols) as u8, (index % cols) as u8);
            match (*contact, seen[index]) {
                (Contact::Idle, true) => {
                    *contact = Contact::Provisional { since: now_ms };
                }
                (Contact::Provisional { since }, true) => {
                    if now_ms.wrapping_sub(since) >= self.timing.debounce_ms {
                        *contact = Contact::Pressed { since };
                        let _ = events.push(KeyEvent {
                            position,
                            kind: PressKind::Down,
                            timestamp_ms: now_ms,
                        });
                    }
                }
                (Contact::Provisional { .. }, false) => {
                    *contact = Contact::Idle;
                }
                (Contact::Pressed { since }, false) => {
                    let held = now_ms.wrapping_sub(since);
                    let kind = if held < self.timing.long_press_ms {
                        PressKind::Tap
                    } else {
                        PressKind::Long
                    };
                    *contact = Contact::Idle;
                    let _ = releases.push(KeyEvent {
                        position,
                        kind,
                        timestamp_ms: now_ms,
                    });
                }
                (Contact::Idle, false) | (Contact::Pressed { .. }, true) => {}
            }
        }

        for event in releases {
            if events.push(event).is_err() {
                break;
            }
        }
        events
    }
}
