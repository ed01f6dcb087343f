use thiserror::Error;

pub type Result<T> = std::result::Result<T, LabError>;

#[derive(Debug, Error)]
pub enum LabError {
    #[error("no audio output device available")]
    DeviceUnavailable,

    #[error("failed to fetch output stream config: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("engine message queue is full")]
    QueueFull,

    #[error("cell ({column}, {row}) lies outside the {total_cells}x{rows} grid")]
    CellOutOfRange {
        column: i64,
        row: i64,
        total_cells: u32,
        rows: u32,
    },

    #[error("no note recorded under hash {0}")]
    UnknownNote(u32),

    #[error("a note already occupies hash {0}")]
    NoteCollision(u32),

    #[error("clip {0} does not exist")]
    NoSuchClip(usize),

    #[error("an arrangement holds at most {0} clips")]
    TooManyClips(usize),

    #[error("filter chain is full ({0} filters)")]
    FilterBankFull(usize),

    #[error("{rows} rows of {cells} cells overflow the note hash")]
    GridTooLarge { rows: u32, cells: f64 },

    #[error("{name} must be positive and finite, got {value}")]
    InvalidDuration { name: &'static str, value: f64 },
}
