use anyhow::Result;
use futures::{pin_mut, StreamExt};
use std::io::Write;

use crate::openai::OpenAiClient;

/// One question/answer pair in the transcript, in submission order.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No brochure generated yet; questions are rejected.
    Idle,
    /// Brochure and grounding text held; questions accepted.
    Ready,
    /// A question is in flight; its answer is still streaming.
    Answering,
}

/// Per-session memory: the current brochure, the grounding text for Q&A,
/// and the running transcript. Lives for one interactive session only.
///
/// At most one brochure's grounding text is held at a time; storing a new
/// brochure replaces it. The transcript is deliberately not cleared on
/// replacement, matching the original behavior (see DESIGN.md).
pub struct Session {
    state: SessionState,
    brochure: String,
    grounding: String,
    history: Vec<ChatTurn>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            brochure: String::new(),
            grounding: String::new(),
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn brochure(&self) -> Option<&str> {
        match self.state {
            SessionState::Idle => None,
            _ => Some(&self.brochure),
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Idle|Ready -> Ready. Replaces any prior brochure and grounding text.
    pub fn store_brochure(&mut self, brochure: String, grounding: String) {
        self.brochure = brochure;
        self.grounding = grounding;
        self.state = SessionState::Ready;
    }

    /// Ready -> Answering. Appends a transcript entry with an empty answer
    /// and returns the grounded system prompt for the model call. Rejected
    /// while Idle (no grounding text) or Answering, before any network
    /// activity happens.
    pub fn begin_turn(&mut self, question: &str) -> Result<String> {
        match self.state {
            SessionState::Idle => {
                anyhow::bail!("No brochure yet. Generate a brochure before asking questions.")
            }
            SessionState::Answering => {
                anyhow::bail!("Still answering the previous question.")
            }
            SessionState::Ready => {}
        }

        self.history.push(ChatTurn {
            question: question.to_string(),
            answer: String::new(),
        });
        self.state = SessionState::Answering;

        Ok(grounded_system_prompt(&self.grounding))
    }

    /// Answering -> Ready. Finalizes the in-flight turn's answer.
    pub fn finish_turn(&mut self, answer: String) {
        if let Some(turn) = self.history.last_mut() {
            turn.answer = answer;
        }
        self.state = SessionState::Ready;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// System prompt that constrains answers to the retained source text.
pub fn grounded_system_prompt(grounding: &str) -> String {
    format!(
        "You are an assistant that answers questions ONLY based on the brochure text provided below.\n\
         If the answer is not in the brochure, say that the fetched information does not mention this.\n\
         Do not make up facts.\n\n\
         Brochure text:\n{}\n",
        grounding
    )
}

/// Answer one question grounded in the session's stored source text,
/// streaming the answer into the sink and the transcript.
pub async fn answer_question(
    openai: &OpenAiClient,
    session: &mut Session,
    question: &str,
    sink: &mut dyn Write,
) -> Result<String> {
    let system_prompt = session.begin_turn(question)?;

    let mut answer = String::new();
    let mut failure = None;
    {
        let stream = openai.chat_stream(&system_prompt, question);
        pin_mut!(stream);

        while let Some(chunk) = stream.next().await {
            let step = chunk.and_then(|text| {
                write!(sink, "{}", text)?;
                sink.flush()?;
                answer.push_str(&text);
                Ok(())
            });
            if let Err(e) = step {
                failure = Some(e);
                break;
            }
        }
    }

    // The turn is finished even when the call fails, so the session stays
    // usable; the transcript entry keeps whatever streamed before the error.
    session.finish_turn(answer.clone());

    match failure {
        Some(e) => Err(e),
        None => Ok(answer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_rejected_while_idle() {
        let mut session = Session::new();
        assert!(session.begin_turn("Who are the customers?").is_err());
        assert!(session.history().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_brochure_transitions_to_ready() {
        let mut session = Session::new();
        assert!(session.brochure().is_none());

        session.store_brochure("# Acme".to_string(), "Acme makes anvils.".to_string());
        assert!(session.is_ready());
        assert_eq!(session.brochure(), Some("# Acme"));
    }

    #[test]
    fn test_two_sequential_turns_in_order() {
        let mut session = Session::new();
        session.store_brochure("# Acme".to_string(), "Acme makes anvils.".to_string());

        session.begin_turn("What does Acme make?").unwrap();
        assert_eq!(session.state(), SessionState::Answering);
        session.finish_turn("Anvils.".to_string());
        assert!(session.is_ready());

        session.begin_turn("Who buys them?").unwrap();
        session.finish_turn("Coyotes.".to_string());

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "What does Acme make?");
        assert_eq!(history[0].answer, "Anvils.");
        assert_eq!(history[1].question, "Who buys them?");
        assert_eq!(history[1].answer, "Coyotes.");
    }

    #[test]
    fn test_question_rejected_while_answering() {
        let mut session = Session::new();
        session.store_brochure("# Acme".to_string(), "Acme makes anvils.".to_string());

        session.begin_turn("First?").unwrap();
        assert!(session.begin_turn("Second?").is_err());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_new_brochure_replaces_grounding_keeps_history() {
        let mut session = Session::new();
        session.store_brochure("# Acme".to_string(), "Acme makes anvils.".to_string());
        session.begin_turn("What does Acme make?").unwrap();
        session.finish_turn("Anvils.".to_string());

        session.store_brochure("# Globex".to_string(), "Globex makes lasers.".to_string());

        // Old transcript survives the replacement
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.brochure(), Some("# Globex"));

        // New questions are grounded in the new text only
        let prompt = session.begin_turn("What does Globex make?").unwrap();
        assert!(prompt.contains("Globex makes lasers."));
        assert!(!prompt.contains("Acme makes anvils."));
    }

    #[test]
    fn test_grounded_prompt_embeds_text_and_guardrails() {
        let prompt = grounded_system_prompt("Acme was founded in 1952.");
        assert!(prompt.contains("Acme was founded in 1952."));
        assert!(prompt.contains("ONLY based on the brochure text"));
        assert!(prompt.contains("Do not make up facts."));
    }
}
