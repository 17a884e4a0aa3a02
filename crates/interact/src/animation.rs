/// Visual sequence a tree can be playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Crown wobbles after a hit.
    Shake,
    /// Crown topples after the last hit on a standing tree.
    Fall,
    /// Pause after a hit on a stump.
    RootDelay,
}

impl AnimationKind {
    /// Duration in seconds.
    pub fn duration(self) -> f32 {
        match self {
            AnimationKind::Shake | AnimationKind::RootDelay => 0.75,
            AnimationKind::Fall => 2.5,
        }
    }
}

/// A multi-tick task owned by one tree. Advanced by the owner, never awaited.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    kind: AnimationKind,
    elapsed: f32,
}

impl Animation {
    pub fn start(kind: AnimationKind) -> Self {
        Self { kind, elapsed: 0.0 }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    /// Fraction complete, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.kind.duration()).min(1.0)
    }

    /// Advance by `dt` seconds. Returns true once the animation has finished.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        self.elapsed >= self.kind.duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake_finishes_after_duration() {
        let mut anim = Animation::start(AnimationKind::Shake);
        assert!(!anim.advance(0.5));
        assert!(anim.advance(0.25));
        assert_eq!(anim.progress(), 1.0);
    }

    #[test]
    fn negative_dt_does_not_rewind() {
        let mut anim = Animation::start(AnimationKind::Fall);
        anim.advance(1.0);
        anim.advance(-5.0);
        assert!((anim.progress() - 0.4).abs() < 1e-6);
    }
}
