use crate::app::server::game::{Board, Mark};

/// One game session, persisted as a whole record under its room id.
///
/// `users` is ordered and the order is load-bearing: `users[0]` plays `X`
/// and `users[1]` plays `O` for the lifetime of the room, rematches
/// included. `score` is index-aligned with `users`.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct Room {
    pub room_id: String,
    pub users: Vec<String>,
    pub board: Board,
    pub current_player: String,
    pub game_over: bool,
    pub winner: Option<String>,
    pub score: [u32; 2],
}

impl Room {
    pub fn new(room_id: String, creator: String) -> Self {
        Self {
            room_id,
            users: vec![creator.clone()],
            board: Board::default(),
            current_player: creator,
            game_over: false,
            winner: None,
            score: [0, 0],
        }
    }

    pub fn contains_user(&self, name: &str) -> bool {
        self.users.iter().any(|user| user == name)
    }

    pub fn is_full(&self) -> bool {
        self.users.len() >= 2
    }

    pub fn add_user(&mut self, name: String) -> usize {
        self.users.push(name);
        self.users.len()
    }

    /// The mark a user plays, by position. `None` for strangers.
    pub fn mark_of(&self, name: &str) -> Option<Mark> {
        match self.users.iter().position(|user| user == name) {
            Some(0) => Some(Mark::X),
            Some(1) => Some(Mark::O),
            _ => None,
        }
    }

    pub fn user_of(&self, mark: Mark) -> Option<&str> {
        let index = match mark {
            Mark::X => 0,
            Mark::O => 1,
        };
        self.users.get(index).map(String::as_str)
    }

    pub fn other_user(&self, name: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|user| *user != name)
            .map(String::as_str)
    }

    /// Place a mark and hand the turn to the other user.
    pub fn record_move(&mut self, mark: Mark, index: usize) {
        self.board[index] = Some(mark);
        let next = self
            .other_user(&self.current_player.clone())
            .map(str::to_string);
        if let Some(next) = next {
            self.current_player = next;
        }
    }

    /// Record a win for the user playing `mark` and bump their tally.
    pub fn record_win(&mut self, mark: Mark) {
        self.winner = self.user_of(mark).map(str::to_string);
        let score_index = match mark {
            Mark::X => 0,
            Mark::O => 1,
        };
        self.score[score_index] += 1;
        self.game_over = true;
    }

    pub fn record_draw(&mut self) {
        self.winner = None;
        self.game_over = true;
    }

    /// Fresh board for the same pair. The accepter concedes the first move
    /// to the other user; marks and score carry over.
    pub fn reset_for_rematch(&mut self, accepter: &str) {
        self.board = Board::default();
        self.winner = None;
        self.game_over = false;
        let other = self.other_user(accepter).map(str::to_string);
        if let Some(other) = other {
            self.current_player = other;
        }
    }
}
