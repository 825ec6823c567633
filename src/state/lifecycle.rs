// Running / Paused / Ended, plus the epoch that stale async replies are checked against.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Ended,
}

/// Token captured before an await; compared again before touching UI state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Epoch(u64);

#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: Phase,
    epoch: u64,
    torn_down: bool,
    quitting: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: Phase::Running,
            epoch: 0,
            torn_down: false,
            quitting: false,
        }
    }
}

impl Lifecycle {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn epoch(&self) -> Epoch {
        Epoch(self.epoch)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running && !self.torn_down
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running || self.quitting {
            return false;
        }
        self.phase = Phase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused || self.quitting {
            return false;
        }
        self.phase = Phase::Running;
        true
    }

    /// Running/Paused to Ended. False if already ended.
    pub fn end(&mut self) -> bool {
        if self.phase == Phase::Ended {
            return false;
        }
        self.phase = Phase::Ended;
        self.quitting = false;
        true
    }

    pub fn begin_quit(&mut self) -> bool {
        if self.phase == Phase::Ended || self.quitting || self.torn_down {
            return false;
        }
        self.quitting = true;
        true
    }

    pub fn abort_quit(&mut self) {
        self.quitting = false;
    }

    /// Fresh game: new epoch, Running. Replies issued before this are now stale.
    pub fn restart(&mut self) -> Epoch {
        self.epoch += 1;
        self.phase = Phase::Running;
        self.quitting = false;
        self.torn_down = false;
        Epoch(self.epoch)
    }

    pub fn teardown(&mut self) {
        self.epoch += 1;
        self.torn_down = true;
    }

    /// Poll and action replies are applied only while this exact game is running.
    pub fn accepts_updates(&self, epoch: Epoch) -> bool {
        self.is_current(epoch) && self.phase == Phase::Running && !self.quitting
    }

    /// Same game, not torn down. Used for the summary fetch, which runs after Ended.
    pub fn is_current(&self, epoch: Epoch) -> bool {
        !self.torn_down && epoch.0 == self.epoch
    }
}
