//! The external semantic judge and its production implementation.

use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::JudgeError;
use crate::model::{Company, Incentive};

/// One per-candidate compatibility assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Compatibility in [0,1].
    pub score: f32,
    /// Short natural-language justification bullets.
    pub justification: Vec<String>,
}

/// An external judge producing one assessment per (query, candidate) pair.
pub trait SemanticJudge: Send + Sync {
    /// Identity used in cache keys; distinct judges (or models) must not
    /// share cached assessments.
    fn name(&self) -> &str;

    /// Assesses one candidate against the query.
    fn assess(
        &self,
        query_summary: &str,
        candidate_summary: &str,
    ) -> impl std::future::Future<Output = Result<Assessment, JudgeError>> + Send;
}

/// Compact query-side prompt text.
pub fn summarize_incentive(incentive: &Incentive) -> String {
    let mut summary = format!("Incentivo: {}", incentive.title);

    if let Some(desc) = &incentive.description {
        summary.push_str("\nDescrição: ");
        summary.push_str(desc);
    }

    let c = &incentive.criteria;
    if !c.investment_objectives.is_empty() {
        summary.push_str("\nObjetivos: ");
        summary.push_str(&c.investment_objectives.join(", "));
    }
    if !c.eligibility_notes.is_empty() {
        summary.push_str("\nCritérios: ");
        summary.push_str(
            &c.eligibility_notes
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        );
    }

    summary
}

/// Compact candidate-side prompt text.
pub fn summarize_company(company: &Company) -> String {
    let mut summary = format!("Empresa: {}", company.name);

    if !company.sector_codes.is_empty() {
        summary.push_str(" (CAE: ");
        summary.push_str(
            &company
                .sector_codes
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        );
        summary.push(')');
    }
    if let Some(district) = &company.district {
        summary.push_str(" - ");
        summary.push_str(district);
    }
    if let Some(desc) = &company.description {
        summary.push('\n');
        summary.push_str(desc);
    }

    summary
}

const SYSTEM_PROMPT: &str =
    "Você é um especialista em matching de incentivos públicos com empresas. \
     Responda apenas com JSON válido.";

/// Raw judge reply: a 0-10 score plus short reasons.
#[derive(Debug, Deserialize)]
struct JudgeReply {
    score: f32,
    #[serde(default)]
    reasons: Vec<String>,
}

/// Judge backed by a `genai` chat model.
#[derive(Clone)]
pub struct GenAiJudge {
    client: Client,
    model: String,
}

impl GenAiJudge {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn prompt(query_summary: &str, candidate_summary: &str) -> String {
        format!(
            "Avalia a adequação desta empresa ao seguinte incentivo.\n\n\
             {query_summary}\n\n\
             {candidate_summary}\n\n\
             Atribui um score de 0 a 10 (0=inadequada, 10=perfeita) e 2-3 \
             razões curtas.\n\
             Responde em JSON: {{\"score\": 0-10, \"reasons\": [\"...\"]}}"
        )
    }

    async fn exec(&self, prompt: &str) -> Result<String, JudgeError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| JudgeError::Transport {
                message: e.to_string(),
            })?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(JudgeError::Refused {
                message: "empty completion".to_string(),
            }),
        }
    }
}

/// Extracts the JSON object from a completion that may wrap it in code
/// fences or prose.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn parse_reply(text: &str) -> Result<Assessment, serde_json::Error> {
    let reply: JudgeReply = serde_json::from_str(extract_json(text))?;

    Ok(Assessment {
        score: (reply.score / 10.0).clamp(0.0, 1.0),
        justification: reply.reasons,
    })
}

impl SemanticJudge for GenAiJudge {
    fn name(&self) -> &str {
        &self.model
    }

    async fn assess(
        &self,
        query_summary: &str,
        candidate_summary: &str,
    ) -> Result<Assessment, JudgeError> {
        let prompt = Self::prompt(query_summary, candidate_summary);

        let text = self.exec(&prompt).await?;

        match parse_reply(&text) {
            Ok(assessment) => Ok(assessment),
            Err(first_err) => {
                // One repair attempt; a second malformed reply is definitive.
                debug!(error = %first_err, "Malformed judge reply, attempting repair");

                let repair_prompt = format!(
                    "{prompt}\n\nA resposta anterior não era JSON válido. \
                     Responde APENAS com o objeto JSON pedido."
                );

                let repaired = self.exec(&repair_prompt).await?;
                parse_reply(&repaired).map_err(|e| JudgeError::Malformed {
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_normalizes_score() {
        let assessment = parse_reply(r#"{"score": 8, "reasons": ["área relevante"]}"#).unwrap();
        assert!((assessment.score - 0.8).abs() < 1e-6);
        assert_eq!(assessment.justification, vec!["área relevante"]);
    }

    #[test]
    fn test_parse_reply_clamps_out_of_range() {
        assert_eq!(parse_reply(r#"{"score": 15}"#).unwrap().score, 1.0);
        assert_eq!(parse_reply(r#"{"score": -3}"#).unwrap().score, 0.0);
    }

    #[test]
    fn test_parse_reply_tolerates_code_fences() {
        let text = "```json\n{\"score\": 5, \"reasons\": []}\n```";
        let assessment = parse_reply(text).unwrap();
        assert!((assessment.score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_reply_rejects_prose() {
        assert!(parse_reply("a empresa parece adequada").is_err());
    }

    #[test]
    fn test_summaries_carry_key_fields() {
        let incentive = Incentive {
            incentive_id: "inc-1".into(),
            title: "Apoio solar".into(),
            description: Some("Painéis".into()),
            criteria: Default::default(),
            total_budget: None,
            embedding: None,
        };
        let summary = summarize_incentive(&incentive);
        assert!(summary.contains("Apoio solar"));
        assert!(summary.contains("Painéis"));

        let company = Company {
            company_id: "co-1".into(),
            name: "Solar Lda".into(),
            sector_codes: vec!["35113".into()],
            size: crate::model::SizeClass::Pme,
            district: Some("Faro".into()),
            description: None,
            embedding: None,
        };
        let summary = summarize_company(&company);
        assert!(summary.contains("Solar Lda"));
        assert!(summary.contains("35113"));
        assert!(summary.contains("Faro"));
    }
}
