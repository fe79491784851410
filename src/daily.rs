use chrono::NaiveDate;
use clap::ValueEnum;
use std::path::Path;
use tracing::{error, info, warn};

use crate::{
    agent::{AgentError, OllamaAgent},
    config::Config,
    format::Formatter,
    git::{commit_message, GitRepo},
    model::Entry,
    prompt::{self, FALLBACK_ANSWER, FALLBACK_QUESTION, QUESTION_PROMPT},
    storage::LocalSaver
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Server-picked prompt, answer logged as a block in the prompts file.
    Random,
    /// Model-written history question, logged to the questions and answers files.
    Trivia,
    /// Like trivia, but follows up on the latest answer logged today.
    Chain
}

#[derive(Debug)]
pub struct Report {
    pub entry: Entry,
    pub saved: bool,
    pub committed: bool
}

pub struct DailyJob {
    config: Config,
    agent: OllamaAgent,
    repo: GitRepo,
    push: bool
}

impl DailyJob {
    pub fn new(config: Config, agent: OllamaAgent, push: bool) -> Self {
        let repo = GitRepo::new(config.repo_path.clone());
        DailyJob {
            config,
            agent,
            repo,
            push
        }
    }

    pub fn from_config(config: Config, push: bool) -> Result<Self, AgentError> {
        let agent = OllamaAgent::from_config(&config)?;
        Ok(Self::new(config, agent, push))
    }

    /// One full pass: ask, append, commit. Failures are logged, never returned.
    pub async fn run(&self, mode: Mode, date: NaiveDate) -> Report {
        let entry = match mode {
            Mode::Random => self.ask_random(date).await,
            Mode::Trivia => self.ask_trivia(date).await,
            Mode::Chain => self.ask_chain(date).await
        };
        info!("Prompt: {}", entry.prompt);
        info!("Answer: {}", entry.answer);

        let saved = match self.save(mode, &entry) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to append to log: {}", e);
                false
            }
        };
        if !saved {
            return Report { entry, saved, committed: false };
        }

        let committed = match self.repo.commit_and_push(&commit_message(&entry.day()), self.push).await {
            Ok(()) => true,
            Err(e) => {
                error!("Git operation failed: {}", e);
                false
            }
        };
        Report { entry, saved, committed }
    }

    async fn ask_random(&self, date: NaiveDate) -> Entry {
        let prompt = self.agent.random_prompt().await;
        let answer = self.agent.answer(&prompt).await;
        Entry::new(date, prompt, answer)
    }

    async fn ask_trivia(&self, date: NaiveDate) -> Entry {
        let question = self.fresh_question().await;
        let answer = self.agent
            .generate_or(&prompt::answer_prompt(&question), FALLBACK_ANSWER)
            .await;
        Entry::new(date, question, answer)
    }

    async fn ask_chain(&self, date: NaiveDate) -> Entry {
        let previous = LocalSaver::read_lines_for_date(&self.config.answers_path(), date)
            .unwrap_or_else(|e| {
                warn!("Failed to read previous answers: {}", e);
                Vec::new()
            });
        let question = match previous.last() {
            Some(last) => prompt::follow_up_question(&prompt::first_sentence(last)),
            None => self.fresh_question().await
        };
        info!("{} previous answers today", previous.len());
        let answer = self.agent
            .generate_or(&prompt::answer_prompt_avoiding(&question, &previous), FALLBACK_ANSWER)
            .await;
        Entry::new(date, question, answer)
    }

    // asks again while the question is already in the questions log.
    async fn fresh_question(&self) -> String {
        let path = self.config.questions_path();
        let mut question = String::new();
        for attempt in 1..=self.config.max_attempts {
            question = Formatter::single_line(
                &self.agent.generate_or(QUESTION_PROMPT, FALLBACK_QUESTION).await
            );
            if !already_asked(&path, &question) {
                return question;
            }
            warn!("attempt {}: question already asked: {}", attempt, question);
        }
        question
    }

    fn save(&self, mode: Mode, entry: &Entry) -> std::io::Result<()> {
        match mode {
            Mode::Random => LocalSaver::append_to_file(&self.config.prompts_path(), &Formatter::to_block(entry)),
            // a question never lands without its answer.
            Mode::Trivia | Mode::Chain => LocalSaver::append_all(&[
                (self.config.questions_path(), Formatter::to_dated_line(entry.date, &entry.prompt)),
                (self.config.answers_path(), Formatter::to_dated_line(entry.date, &entry.answer)),
            ])
        }
    }
}

fn already_asked(path: &Path, question: &str) -> bool {
    LocalSaver::contains_text(path, question).unwrap_or_else(|e| {
        warn!("Failed to read questions log: {}", e);
        false
    })
}
