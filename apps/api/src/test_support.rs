//! Stub collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::llm_client::{LlmError, TextGenerator};
use crate::render::{PageRenderer, RenderError, RenderedPage, PAGE_HEIGHT_PX};

type Responder = Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>;

/// Text generator that replays a fixed script, or answers through a closure once the
/// script runs dry. With neither, every call yields `LlmError::EmptyContent`.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    responder: Option<Responder>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            responder: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn from_fn(f: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static) -> Self {
        Self {
            responder: Some(Box::new(f)),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        match &self.responder {
            Some(f) => f(prompt),
            None => Err(LlmError::EmptyContent),
        }
    }
}

/// Answers every fresh-generation prompt with distinct sentinel bullets derived from the
/// context phrase, so different sections and positions never collide.
pub fn context_echo_generator(per_call: usize) -> ScriptedGenerator {
    let counter = AtomicUsize::new(0);
    ScriptedGenerator::from_fn(move |prompt| {
        let call = counter.fetch_add(1, Ordering::SeqCst);
        let context = prompt
            .split("achievement-focused bullets ")
            .nth(1)
            .and_then(|rest| rest.split(" with concrete").next())
            .unwrap_or("tailored");
        let verbs = ["Built", "Led", "Cut", "Drove", "Shipped", "Scaled", "Automated"];
        Ok((0..per_call)
            .map(|i| format!(">>{} item {i} call {call} {context}", verbs[i % verbs.len()]))
            .collect::<Vec<_>>()
            .join("\n"))
    })
}

type Measure = Box<dyn Fn(&str) -> u32 + Send + Sync>;

/// Renderer that measures markup through a closure and records every call.
pub struct StubRenderer {
    measure: Measure,
    renders: AtomicUsize,
    fail: bool,
}

impl StubRenderer {
    pub fn new(measure: impl Fn(&str) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            measure: Box::new(measure),
            renders: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn always_fits() -> Self {
        Self::new(|_| PAGE_HEIGHT_PX)
    }

    pub fn always_overflows() -> Self {
        Self::new(|_| PAGE_HEIGHT_PX * 2)
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::always_fits()
        }
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for StubRenderer {
    async fn render(&self, markup: &str) -> Result<RenderedPage, RenderError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RenderError::Exit(1));
        }
        Ok(RenderedPage {
            pdf: Bytes::from_static(b"%PDF-1.4 stub"),
            measured_height: (self.measure)(markup),
        })
    }
}
