//! Available subcommands.

use clap::Subcommand;
use parlance_core::Difficulty;

#[derive(Subcommand)]
pub enum Commands {
    /// Practice a phrase of your choice
    Practice {
        /// Phrase to pronounce
        #[arg(short, long)]
        text: String,
    },

    /// List challenges of one difficulty
    Challenges {
        /// easy, medium or hard
        #[arg(short, long, default_value_t = Difficulty::Easy)]
        difficulty: Difficulty,
    },

    /// Practice a challenge
    Challenge {
        /// Challenge id (see `parlance challenges`)
        id: i64,
    },
}
