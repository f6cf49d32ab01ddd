//! One-shot continuation for the "enter a duration" prompt

use pomobar_core::models::DurationKind;
use tokio::sync::oneshot;

/// Host side: answer with the user's text or dismiss.
#[derive(Debug)]
pub struct DurationPrompt {
    kind: DurationKind,
    responder: oneshot::Sender<Option<String>>,
}

/// Timer side: resolves once the host answers.
#[derive(Debug)]
pub struct DurationReply {
    kind: DurationKind,
    receiver: oneshot::Receiver<Option<String>>,
}

pub fn duration_prompt(kind: DurationKind) -> (DurationPrompt, DurationReply) {
    let (responder, receiver) = oneshot::channel();
    (
        DurationPrompt { kind, responder },
        DurationReply { kind, receiver },
    )
}

impl DurationPrompt {
    pub fn text(&self) -> &'static str {
        self.kind.prompt()
    }

    pub fn submit(self, input: String) {
        let _ = self.responder.send(Some(input));
    }

    pub fn dismiss(self) {
        let _ = self.responder.send(None);
    }
}

impl DurationReply {
    pub fn kind(&self) -> DurationKind {
        self.kind
    }

    /// `None` when the prompt was dismissed or dropped unanswered.
    pub async fn recv(self) -> Option<String> {
        self.receiver.await.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_reaches_reply() {
        let (prompt, reply) = duration_prompt(DurationKind::Work);
        assert_eq!(prompt.text(), "Enter Work Duration in Minutes");

        prompt.submit("15".to_string());
        assert_eq!(reply.recv().await, Some("15".to_string()));
    }

    #[tokio::test]
    async fn test_dismiss_and_drop_resolve_to_none() {
        let (prompt, reply) = duration_prompt(DurationKind::Break);
        prompt.dismiss();
        assert_eq!(reply.recv().await, None);

        let (prompt, reply) = duration_prompt(DurationKind::Break);
        drop(prompt);
        assert_eq!(reply.recv().await, None);
    }
}
