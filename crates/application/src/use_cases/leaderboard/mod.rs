pub mod get_player_rank;
pub mod get_top_n;
pub mod record_score;

pub use get_player_rank::GetPlayerRankUseCase;
pub use get_top_n::GetTopNUseCase;
pub use record_score::RecordScoreUseCase;
