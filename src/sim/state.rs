//! Session state: score, lives, level, pause and game over
//!
//! Level is never stored on its own authority; [`GameState::update`]
//! re-derives it from the score every frame. Every mutation is announced to
//! the registered observers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// State change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    LivesChanged { lives: u32 },
    LevelChanged { level: u32, previous: u32 },
    GameOver { final_score: u64 },
    PauseChanged { paused: bool },
}

/// Subscriber to state changes (HUD, toasts, score store)
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

/// Observer that keeps every event in a shared log
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl GameObserver for EventRecorder {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Level reached at `score` when each level spans `points_per_level`
pub fn calc_level(score: u64, points_per_level: u64) -> u32 {
    if points_per_level == 0 {
        return 1;
    }
    u32::try_from(score / points_per_level)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Minimum score of `level`
pub fn level_threshold(level: u32, points_per_level: u64) -> u64 {
    u64::from(level.saturating_sub(1)) * points_per_level
}

pub struct GameState {
    score: u64,
    lives: u32,
    max_lives: u32,
    level: u32,
    paused: bool,
    game_over: bool,
    points_per_level: u64,
    observers: Vec<Box<dyn GameObserver>>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("score", &self.score)
            .field("lives", &self.lives)
            .field("max_lives", &self.max_lives)
            .field("level", &self.level)
            .field("paused", &self.paused)
            .field("game_over", &self.game_over)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl GameState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.session.lives,
            max_lives: tuning.session.lives,
            level: 1,
            paused: false,
            game_over: false,
            points_per_level: tuning.session.points_per_level,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn add_score(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.emit(GameEvent::ScoreChanged { score: self.score });
    }

    /// Lose a life; reaching zero ends the game (once)
    pub fn decrement_lives(&mut self) {
        if self.lives == 0 {
            return;
        }
        self.lives -= 1;
        self.emit(GameEvent::LivesChanged { lives: self.lives });

        if self.lives == 0 && !self.game_over {
            self.game_over = true;
            log::info!("Game over with score {}", self.score);
            self.emit(GameEvent::GameOver {
                final_score: self.score,
            });
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        self.emit(GameEvent::PauseChanged { paused });
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    /// Re-derive the level from the score
    pub fn update(&mut self) {
        let level = calc_level(self.score, self.points_per_level);
        if level != self.level {
            let previous = self.level;
            self.level = level;
            log::info!("Level {} reached at score {}", level, self.score);
            self.emit(GameEvent::LevelChanged { level, previous });
        }
    }

    /// Fresh session; observers stay subscribed
    pub fn reset(&mut self) {
        let previous = self.level;
        self.score = 0;
        self.lives = self.max_lives;
        self.level = 1;
        self.paused = false;
        self.game_over = false;
        self.emit(GameEvent::ScoreChanged { score: 0 });
        self.emit(GameEvent::LivesChanged { lives: self.lives });
        self.emit(GameEvent::LevelChanged { level: 1, previous });
    }
}
