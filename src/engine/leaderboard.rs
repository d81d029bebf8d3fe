//! # engine::leaderboard
//!
//! Ranks agents by balance. The top of the final standings is the champion.

use serde::Serialize;

use crate::models::{Agent, Position};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based.
    pub rank: usize,
    pub agent_id: String,
    pub name: String,
    pub avatar: String,
    pub balance: f64,
    pub pnl_percent: f64,
    pub position: Option<Position>,
}

/// Agents sorted by balance, highest first. Ties keep roster order.
pub fn standings(agents: &[Agent]) -> Vec<Standing> {
    let mut sorted: Vec<&Agent> = agents.iter().collect();
    sorted.sort_by(|a, b| b.balance.total_cmp(&a.balance));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, agent)| Standing {
            rank: i + 1,
            agent_id: agent.id.clone(),
            name: agent.name.clone(),
            avatar: agent.avatar.clone(),
            balance: agent.balance,
            pnl_percent: agent.pnl_percent,
            position: agent.position,
        })
        .collect()
}

pub fn champion(agents: &[Agent]) -> Option<Standing> {
    standings(agents).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, balance: f64) -> Agent {
        let mut agent = Agent::new(id, id, "🤖", 100_000.0);
        agent.set_balance(balance);
        agent
    }

    #[test]
    fn test_sorted_by_balance_desc() {
        let agents = vec![agent("a", 99_000.0), agent("b", 104_000.0), agent("c", 101_500.0)];
        let table = standings(&agents);

        let ids: Vec<&str> = table.iter().map(|s| s.agent_id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
        assert_eq!(table.iter().map(|s| s.rank).collect::<Vec<_>>(), [1, 2, 3]);
        assert!((table[0].pnl_percent - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_roster_order() {
        let agents = vec![agent("a", 100_000.0), agent("b", 100_000.0)];
        assert_eq!(champion(&agents).map(|s| s.agent_id), Some("a".to_string()));
    }

    #[test]
    fn test_empty_roster_has_no_champion() {
        assert!(champion(&[]).is_none());
    }
}
