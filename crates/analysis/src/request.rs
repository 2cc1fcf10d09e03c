//! Analysis request payload and prompt text.

use segment_core::{Segment, SegmentResult, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Members sent along with a segment for analysis.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Everything the summarizer sees about a segment. Rules and sample users
/// travel as JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub segment_name: String,
    pub segment_rules: String,
    pub sample_users: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisOutput {
    pub analysis: String,
}

impl AnalysisRequest {
    /// Build a request from a segment and its members, keeping only the
    /// first `sample_size` members.
    pub fn new(segment: &Segment, members: &[User], sample_size: usize) -> SegmentResult<Self> {
        let sample = &members[..members.len().min(sample_size)];
        Ok(Self {
            segment_name: segment.name.clone(),
            segment_rules: serde_json::to_string(&segment.rules)?,
            sample_users: serde_json::to_string(sample)?,
        })
    }

    pub fn render_prompt(&self) -> String {
        format!(
            "You are an expert marketing analyst tasked with understanding user segments.\n\
             \n\
             Based on the segment's name, rules, and a sample of its users, generate a concise \
             but insightful analysis of the segment's key characteristics.\n\
             \n\
             Segment Name: {}\n\
             Segment Rules: {}\n\
             Sample Users: {}\n\
             \n\
             Analysis:",
            self.segment_name, self.segment_rules, self.sample_users
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segment_core::{Operator, Rule};

    fn members(n: i64) -> Vec<User> {
        (0..n).map(|i| User::new().with("id", i)).collect()
    }

    #[test]
    fn test_sample_is_bounded() {
        let segment = Segment::new("Pros", vec![Rule::new("isPro", Operator::Equals, "true")]);
        let request = AnalysisRequest::new(&segment, &members(50), DEFAULT_SAMPLE_SIZE).unwrap();
        let sample: Vec<User> = serde_json::from_str(&request.sample_users).unwrap();
        assert_eq!(sample.len(), 20);
        assert_eq!(sample[0], User::new().with("id", 0_i64));

        let small = AnalysisRequest::new(&segment, &members(3), DEFAULT_SAMPLE_SIZE).unwrap();
        let sample: Vec<User> = serde_json::from_str(&small.sample_users).unwrap();
        assert_eq!(sample.len(), 3);
    }

    #[test]
    fn test_rules_serialized() {
        let mut rule = Rule::new("postCount", Operator::GreaterThan, "30");
        rule.id = "rule1".into();
        let segment = Segment::new("Posters", vec![rule]);
        let request = AnalysisRequest::new(&segment, &[], DEFAULT_SAMPLE_SIZE).unwrap();
        assert_eq!(
            request.segment_rules,
            r#"[{"id":"rule1","field":"postCount","operator":">","value":"30"}]"#
        );
        assert_eq!(request.sample_users, "[]");
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let request = AnalysisRequest {
            segment_name: "New Yorkers".into(),
            segment_rules: "[]".into(),
            sample_users: "[]".into(),
        };
        let prompt = request.render_prompt();
        assert!(prompt.contains("Segment Name: New Yorkers\n"));
        assert!(prompt.ends_with("Analysis:"));
    }

    #[test]
    fn test_wire_names() {
        let request = AnalysisRequest {
            segment_name: "x".into(),
            segment_rules: "[]".into(),
            sample_users: "[]".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("segmentName").is_some());
        assert!(json.get("sampleUsers").is_some());
    }
}
