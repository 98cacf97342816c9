#[cfg(test)]
mod tests {
    use caro_core::engine::config::EngineConfig;
    use caro_core::engine::search::AlphaBetaEngine;
    use caro_core::engine::EngineError;
    use caro_core::logic::eval_constants::WIN_SCORE;
    use caro_core::protocol::{handle_request, MoveRequest, MoveResponse};
    use std::sync::Arc;

    fn engine() -> AlphaBetaEngine {
        AlphaBetaEngine::new(Arc::new(EngineConfig::default()))
    }

    fn run(json: &str) -> Result<MoveResponse, EngineError> {
        let request: MoveRequest = serde_json::from_str(json).unwrap();
        handle_request(&mut engine(), &request)
    }

    #[test]
    fn test_json_request_with_depth_budget() {
        let json = r#"{
            "board": [
                [0, 0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0, 0],
                [0, -1, -1, -1, -1, 0, 0],
                [0, 1, 1, 1, 0, 0, 0],
                [0, 0, 0, 0, 1, 0, 0],
                [0, 0, 0, 0, 0, 0, 0]
            ],
            "sideToMove": -1,
            "budget": 4,
            "budgetKind": "depth",
            "config": { "zobrist_seed": 9, "tt_size_mb": 1 }
        }"#;
        let response = run(json).unwrap();
        assert_eq!(response.best_move.row, 2);
        assert!(response.best_move.col == 0 || response.best_move.col == 5);
        assert_eq!(response.best_move.score, WIN_SCORE - 1);
        assert!(response.nodes_visited > 0);

        let text = serde_json::to_string(&response).unwrap();
        assert!(text.contains("\"bestMove\""));
        assert!(text.contains("\"elapsedSeconds\""));
        assert!(text.contains("\"nodesVisited\""));
    }

    #[test]
    fn test_json_request_with_time_budget() {
        let mut board = vec![vec![0; 15]; 15];
        board[7][7] = 1;
        board[7][8] = -1;
        board[8][8] = 1;
        let json = serde_json::json!({
            "board": board,
            "sideToMove": -1,
            "budget": 150
        })
        .to_string();
        let response = run(&json).unwrap();
        let (r, c) = (response.best_move.row(), response.best_move.col());
        assert_eq!(board[r][c], 0);
        assert!(response.depth >= 2);
        assert!(response.elapsed_seconds < 2.0);
    }

    #[test]
    fn test_invalid_requests_fail_fast() {
        assert!(matches!(
            run(r#"{"board": [], "sideToMove": 1, "budget": 100}"#),
            Err(EngineError::InvalidBoard(_))
        ));
        assert!(matches!(
            run(r#"{"board": [[0,0,0,0,0],[0,0,0,0,0],[0,0,0,0,0],[0,0,0,0,0],[0,0,0,0,0]], "sideToMove": 2, "budget": 100}"#),
            Err(EngineError::InvalidSide(2))
        ));
        assert!(matches!(
            run(r#"{"board": [[0,0,0,0,0],[0,0,0,0,0],[0,0,0,0,0],[0,0,0,0,0],[0,0,0,0,0]], "sideToMove": 1, "budget": 0}"#),
            Err(EngineError::ZeroBudget)
        ));
    }

    #[test]
    fn test_unknown_budget_kind_is_a_json_error() {
        let parsed: Result<MoveRequest, _> = serde_json::from_str(
            r#"{"board": [[0]], "sideToMove": 1, "budget": 1, "budgetKind": "nodes"}"#,
        );
        assert!(parsed.is_err());
    }
}
