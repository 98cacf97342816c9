use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::protocol::{handle_request, MoveRequest, MoveResponse};
use gloo_worker::{HandlerId, Worker, WorkerScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
pub enum Input {
    ComputeMove(MoveRequest),
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Output {
    MoveFound(MoveResponse),
    Rejected(String),
}

pub struct GameWorker {
    engine: AlphaBetaEngine,
}

impl GameWorker {
    /// Answers one message. Every request gets exactly one reply.
    pub fn compute(&mut self, msg: Input) -> Output {
        match msg {
            Input::ComputeMove(request) => match handle_request(&mut self.engine, &request) {
                Ok(response) => Output::MoveFound(response),
                Err(e) => Output::Rejected(e.to_string()),
            },
        }
    }
}

impl Worker for GameWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self {
            engine: AlphaBetaEngine::new(Arc::new(EngineConfig::default())),
        }
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        let output = self.compute(msg);
        scope.respond(id, output);
    }
}
