use std::fmt;

use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::player::{Player, PlayerId};

/// Social hierarchy derived from finish order at every round end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    President,
    #[serde(rename = "Vice-President")]
    VicePresident,
    Citizen,
    #[serde(rename = "Vice-Asshole")]
    ViceAsshole,
    Asshole,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Role::President => "President",
                Role::VicePresident => "Vice-President",
                Role::Citizen => "Citizen",
                Role::ViceAsshole => "Vice-Asshole",
                Role::Asshole => "Asshole",
            }
        )
    }
}

/// Recomputes every role from this round's finish order. Players without a
/// finish order (which should not occur at round end) sort last.
pub fn assign_roles(players: &mut [Player]) {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by_key(|&i| players[i].finish_order.unwrap_or(u32::MAX));

    for player in players.iter_mut() {
        player.role = None;
    }

    let n = order.len();
    match n {
        0 | 1 => {}
        2 => {
            players[order[0]].role = Some(Role::President);
            players[order[1]].role = Some(Role::Asshole);
        }
        3 => {
            players[order[0]].role = Some(Role::President);
            players[order[1]].role = Some(Role::Citizen);
            players[order[2]].role = Some(Role::Asshole);
        }
        _ => {
            players[order[0]].role = Some(Role::President);
            players[order[1]].role = Some(Role::VicePresident);
            players[order[n - 2]].role = Some(Role::ViceAsshole);
            players[order[n - 1]].role = Some(Role::Asshole);
            for &i in &order[2..n - 2] {
                players[i].role = Some(Role::Citizen);
            }
        }
    }
}

/// Private notification for one side of a swap.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapNotice {
    pub given: Vec<Card>,
    pub received: Vec<Card>,
}

/// Runs the role-based exchanges on freshly dealt hands: President takes
/// the Asshole's 2 best cards for their 2 worst, and with 4+ players the
/// vice pair exchanges 1 card the same way. Returns one notice per
/// affected player so each side can be told privately what moved.
pub fn run_swaps(players: &mut [Player]) -> Vec<(PlayerId, SwapNotice)> {
    fn seat_of(players: &[Player], role: Role) -> Option<usize> {
        players.iter().position(|p| p.role == Some(role))
    }

    let mut notices = Vec::new();
    if let (Some(ruler), Some(subject)) = (
        seat_of(players, Role::President),
        seat_of(players, Role::Asshole),
    ) {
        notices.extend(exchange(players, ruler, subject, 2));
    }
    if players.len() >= 4 {
        if let (Some(ruler), Some(subject)) = (
            seat_of(players, Role::VicePresident),
            seat_of(players, Role::ViceAsshole),
        ) {
            notices.extend(exchange(players, ruler, subject, 1));
        }
    }
    notices
}

/// Moves the subject's `n` highest cards to the ruler and the ruler's `n`
/// lowest back. Hands are sorted, so the worst cards sit at the front and
/// the best at the back.
fn exchange(
    players: &mut [Player],
    ruler: usize,
    subject: usize,
    n: usize,
) -> Vec<(PlayerId, SwapNotice)> {
    let best: Vec<Card> = {
        let hand = &mut players[subject].hand;
        let n = n.min(hand.len());
        hand.split_off(hand.len() - n)
    };
    let worst: Vec<Card> = {
        let hand = &mut players[ruler].hand;
        hand.drain(..n.min(hand.len())).collect()
    };

    players[ruler].hand.extend(best.iter().copied());
    players[ruler].hand.sort();
    players[subject].hand.extend(worst.iter().copied());
    players[subject].hand.sort();

    vec![
        (
            players[ruler].id,
            SwapNotice {
                given: worst.clone(),
                received: best.clone(),
            },
        ),
        (
            players[subject].id,
            SwapNotice {
                given: best,
                received: worst,
            },
        ),
    ]
}
