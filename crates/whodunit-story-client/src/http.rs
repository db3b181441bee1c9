//! HTTP story service client.
//!
//! Talks to the story backend's JSON API. Every response arrives in a
//! `{status, message, data}` envelope; a transport failure maps to
//! `Network` and an explicit `status == "error"` to `ServiceLogic`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use whodunit_core::error::EngineError;
use whodunit_core::phase::Phase;
use whodunit_core::story::{
    ActionKind, ChapterOpening, ParticipantSpec, SessionStatus, SimulatedAnswer, SimulatedSpeech,
    StoryService,
};

/// HTTP implementation of the story service contract.
///
/// Bound to one remote session: every request carries the session id the
/// client was constructed with.
#[derive(Debug, Clone)]
pub struct HttpStoryService {
    client: reqwest::Client,
    base_url: String,
    session_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default = "Option::default")]
    data: Option<T>,
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, EngineError> {
    if envelope.status != "success" {
        return Err(EngineError::ServiceLogic(
            envelope
                .message
                .unwrap_or_else(|| "remote reported an unspecified failure".to_owned()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| EngineError::ServiceLogic("success response carried no data".to_owned()))
}

/// Maps the remote lifecycle label onto the engine's phase.
///
/// The remote tracks a coarse lifecycle; position within a running
/// chapter is the engine's own business, so `playing` re-enters at the
/// DM beat of the reported chapter and cycle.
fn phase_from_state(state: &str, chapter: u32) -> Phase {
    match state {
        "finished" => Phase::Ended,
        "playing" if chapter > 0 => Phase::DmSpeak,
        _ => Phase::Idle,
    }
}

#[derive(Debug, Serialize)]
struct ChapterStartRequest<'a> {
    game_session: Uuid,
    chapter_num: u32,
    character_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChapterStartData {
    #[serde(default)]
    dm_speech: Option<String>,
    #[serde(default)]
    dm_tools: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AllSpeechRequest {
    game_session: Uuid,
    chapter: u32,
}

#[derive(Debug, Deserialize)]
struct AllSpeechData {
    #[serde(default)]
    ai_actions: Vec<WireSpeech>,
}

#[derive(Debug, Deserialize)]
struct WireSpeech {
    character_name: String,
    content: String,
    #[serde(default)]
    queries: BTreeMap<String, String>,
    success: bool,
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    game_session: Uuid,
    character_name: &'a str,
    question: &'a str,
    asker: &'a str,
    chapter: u32,
}

#[derive(Debug, Deserialize)]
struct AnswerData {
    answer: String,
}

#[derive(Debug, Serialize)]
struct PlayerActionRequest<'a> {
    game_session: Uuid,
    character_name: &'a str,
    content: &'a str,
    queries: &'a BTreeMap<String, String>,
    chapter: u32,
    cycle: u32,
    action_type: ActionKind,
}

#[derive(Debug, Serialize)]
struct DmSpeakRequest<'a> {
    game_session: Uuid,
    chapter: u32,
    speak_type: &'a str,
    chat_history: &'a str,
}

#[derive(Debug, Deserialize)]
struct DmSpeakData {
    speech: String,
}

#[derive(Debug, Deserialize)]
struct StatusData {
    #[serde(default)]
    current_chapter: u32,
    #[serde(default = "first_cycle")]
    current_cycle: u32,
    #[serde(default)]
    game_state: String,
    #[serde(default)]
    characters: Vec<WireCharacter>,
}

fn first_cycle() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct WireCharacter {
    character_name: String,
    #[serde(default)]
    is_ai: bool,
}

impl HttpStoryService {
    /// A client for the story backend at `base_url`, bound to one session.
    #[must_use]
    pub fn new(base_url: &str, session_id: Uuid) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            session_id,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, EngineError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let envelope: Envelope<T> = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?
            .json()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;
        unwrap_envelope(envelope)
    }

    async fn get<T>(&self, path: &str) -> Result<T, EngineError>
    where
        T: DeserializeOwned,
    {
        let envelope: Envelope<T> = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?
            .json()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;
        unwrap_envelope(envelope)
    }
}

#[async_trait]
impl StoryService for HttpStoryService {
    #[instrument(skip(self))]
    async fn start_chapter(
        &self,
        chapter: u32,
        local_participant: &str,
    ) -> Result<ChapterOpening, EngineError> {
        let data: ChapterStartData = self
            .post(
                "/api/game/chapter/start",
                &ChapterStartRequest {
                    game_session: self.session_id,
                    chapter_num: chapter,
                    character_name: local_participant,
                },
            )
            .await?;
        Ok(ChapterOpening {
            dm_narration: data.dm_speech.unwrap_or_default(),
            chapter_assets: data.dm_tools,
        })
    }

    #[instrument(skip(self))]
    async fn request_all_simulated_speech(
        &self,
        chapter: u32,
    ) -> Result<Vec<SimulatedSpeech>, EngineError> {
        let data: AllSpeechData = self
            .post(
                "/api/game/trigger_all_ai_speak",
                &AllSpeechRequest {
                    game_session: self.session_id,
                    chapter,
                },
            )
            .await?;
        debug!(count = data.ai_actions.len(), "simulated speech batch received");
        Ok(data
            .ai_actions
            .into_iter()
            .map(|entry| SimulatedSpeech {
                participant: entry.character_name,
                content: entry.content,
                queries: entry.queries,
                success: entry.success,
            })
            .collect())
    }

    #[instrument(skip(self, question))]
    async fn request_simulated_answer(
        &self,
        participant: &str,
        question: &str,
        asker: &str,
        chapter: u32,
    ) -> Result<SimulatedAnswer, EngineError> {
        let result: Result<AnswerData, EngineError> = self
            .post(
                "/api/game/ai_answer",
                &AnswerRequest {
                    game_session: self.session_id,
                    character_name: participant,
                    question,
                    asker,
                    chapter,
                },
            )
            .await;
        match result {
            Ok(data) => Ok(SimulatedAnswer {
                answer: data.answer,
            }),
            // A per-participant generation failure must not read like a
            // phase-entry failure to the caller.
            Err(EngineError::ServiceLogic(reason)) => Err(EngineError::SimulatedActor {
                participant: participant.to_owned(),
                reason,
            }),
            Err(other) => Err(other),
        }
    }

    #[instrument(skip(self, content, queries))]
    async fn submit_action(
        &self,
        session_id: Uuid,
        participant: &str,
        content: &str,
        queries: &BTreeMap<String, String>,
        chapter: u32,
        cycle: u32,
        kind: ActionKind,
    ) -> Result<(), EngineError> {
        let _: serde_json::Value = self
            .post(
                "/api/game/player_action",
                &PlayerActionRequest {
                    game_session: session_id,
                    character_name: participant,
                    content,
                    queries,
                    chapter,
                    cycle,
                    action_type: kind,
                },
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self, transcript))]
    async fn chapter_summary(
        &self,
        chapter: u32,
        transcript: &str,
        final_chapter: bool,
    ) -> Result<String, EngineError> {
        let speak_type = if final_chapter {
            "game_end"
        } else {
            "chapter_end"
        };
        let data: DmSpeakData = self
            .post(
                "/api/game/dm_speak",
                &DmSpeakRequest {
                    game_session: self.session_id,
                    chapter,
                    speak_type,
                    chat_history: transcript,
                },
            )
            .await?;
        Ok(data.speech)
    }

    #[instrument(skip(self))]
    async fn poll_session_status(&self, session_id: Uuid) -> Result<SessionStatus, EngineError> {
        let data: StatusData = self
            .get(&format!("/api/game/status/{session_id}"))
            .await?;
        Ok(SessionStatus {
            chapter: data.current_chapter,
            cycle: data.current_cycle,
            phase: phase_from_state(&data.game_state, data.current_chapter),
            roster: data
                .characters
                .into_iter()
                .map(|c| ParticipantSpec {
                    name: c.character_name,
                    is_simulated: c.is_ai,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_maps_to_service_logic() {
        let envelope: Envelope<DmSpeakData> = Envelope {
            status: "error".to_owned(),
            message: Some("script not found".to_owned()),
            data: None,
        };
        let result = unwrap_envelope(envelope);
        assert!(matches!(
            result,
            Err(EngineError::ServiceLogic(msg)) if msg == "script not found"
        ));
    }

    #[test]
    fn test_success_envelope_without_data_is_rejected() {
        let envelope: Envelope<DmSpeakData> = Envelope {
            status: "success".to_owned(),
            message: None,
            data: None,
        };
        assert!(matches!(
            unwrap_envelope(envelope),
            Err(EngineError::ServiceLogic(_))
        ));
    }

    #[test]
    fn test_lifecycle_labels_map_to_phases() {
        assert_eq!(phase_from_state("waiting", 0), Phase::Idle);
        assert_eq!(phase_from_state("character_select", 0), Phase::Idle);
        assert_eq!(phase_from_state("playing", 2), Phase::DmSpeak);
        assert_eq!(phase_from_state("playing", 0), Phase::Idle);
        assert_eq!(phase_from_state("finished", 3), Phase::Ended);
    }

    #[test]
    fn test_speech_batch_deserializes_with_default_queries() {
        let raw = r#"{
            "status": "success",
            "data": {
                "ai_actions": [
                    {"character_name": "Basil", "content": "Hmm.", "success": true}
                ]
            }
        }"#;
        let envelope: Envelope<AllSpeechData> = serde_json::from_str(raw).unwrap();
        let data = unwrap_envelope(envelope).unwrap();
        assert_eq!(data.ai_actions.len(), 1);
        assert!(data.ai_actions[0].queries.is_empty());
    }
}
