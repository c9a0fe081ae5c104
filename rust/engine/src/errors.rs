use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Game-over status does not allow this action")]
    GameOver,
    #[error("Die value out of range: {value}, expected 1-6")]
    InvalidDieValue { value: u8 },
}
