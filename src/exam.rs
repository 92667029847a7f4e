use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ensure};

use crate::card::{Timestamp, check_timestamp};
use crate::error::{InvalidArgumentSnafu, Result};

pub const DEFAULT_PASSING_PERCENTAGE: u32 = 70;

const MILLIS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamQuestion {
    pub id: String,
    pub domain: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainScore {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    /// Empty when the question was left unanswered.
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResult {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score_percentage: u32,
    pub passed: bool,
    pub domain_scores: BTreeMap<String, DomainScore>,
    /// In question order.
    pub answers: Vec<AnswerRecord>,
}

fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (correct as f64 / total as f64 * 100.0).round() as u32
    }
}

/// Grades `answers` (question id to selected answer) against `questions`.
/// Answers to questions outside the exam are ignored.
pub fn score_exam(
    questions: &[ExamQuestion],
    answers: &HashMap<String, String>,
    passing_percentage: u32,
) -> Result<ExamResult> {
    ensure!(
        passing_percentage <= 100,
        InvalidArgumentSnafu {
            reason: format!("passing percentage {passing_percentage} exceeds 100"),
        }
    );

    let mut domain_scores = BTreeMap::<String, DomainScore>::new();
    let records = questions
        .iter()
        .map(|question| {
            let selected = answers.get(&question.id).cloned().unwrap_or_default();
            let is_correct = selected == question.correct_answer;
            let score = domain_scores.entry(question.domain.clone()).or_default();
            score.total += 1;
            score.correct += usize::from(is_correct);
            AnswerRecord {
                question_id: question.id.clone(),
                selected_answer: selected,
                correct_answer: question.correct_answer.clone(),
                is_correct,
                domain: question.domain.clone(),
            }
        })
        .collect::<Vec<_>>();
    for score in domain_scores.values_mut() {
        score.percentage = percentage(score.correct, score.total);
    }

    let correct_answers = records.iter().filter(|record| record.is_correct).count();
    let score_percentage = percentage(correct_answers, questions.len());
    Ok(ExamResult {
        total_questions: questions.len(),
        correct_answers,
        score_percentage,
        passed: !questions.is_empty() && score_percentage >= passing_percentage,
        domain_scores,
        answers: records,
    })
}

pub fn exam_expires_at(started_at: Timestamp, time_limit_minutes: u32) -> Result<Timestamp> {
    check_timestamp(started_at)?;
    started_at
        .checked_add(i64::from(time_limit_minutes) * MILLIS_PER_MINUTE)
        .context(InvalidArgumentSnafu {
            reason: "exam expiry overflows",
        })
}

/// An exam is expired strictly after its time limit has elapsed.
pub fn is_exam_expired(
    started_at: Timestamp,
    time_limit_minutes: u32,
    now: Timestamp,
) -> Result<bool> {
    check_timestamp(now)?;
    Ok(now > exam_expires_at(started_at, time_limit_minutes)?)
}

/// Whole seconds left, never negative.
pub fn remaining_time_seconds(
    started_at: Timestamp,
    time_limit_minutes: u32,
    now: Timestamp,
) -> Result<u64> {
    check_timestamp(now)?;
    let remaining = exam_expires_at(started_at, time_limit_minutes)?.saturating_sub(now);
    Ok((remaining.max(0) / 1000) as u64)
}

pub fn time_taken_minutes(started_at: Timestamp, completed_at: Timestamp) -> Result<u32> {
    check_timestamp(started_at)?;
    ensure!(
        completed_at >= started_at,
        InvalidArgumentSnafu {
            reason: format!("exam completed at {completed_at} before it started at {started_at}"),
        }
    );
    Ok(((completed_at - started_at) as f64 / MILLIS_PER_MINUTE as f64).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;
    use crate::test_helpers::JAN_1_2025;

    fn question(id: &str, domain: &str, correct: &str) -> ExamQuestion {
        ExamQuestion {
            id: id.into(),
            domain: domain.into(),
            correct_answer: correct.into(),
        }
    }

    fn answers(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|&(id, answer)| (id.to_string(), answer.to_string()))
            .collect()
    }

    #[test]
    fn test_score_exam() {
        let questions = [
            question("q1", "asking", "a"),
            question("q2", "asking", "b"),
            question("q3", "reporting", "c"),
            question("q4", "navigation", "d"),
        ];
        let answers = answers(&[("q1", "a"), ("q2", "x"), ("q3", "c"), ("extra", "z")]);
        let result = score_exam(&questions, &answers, DEFAULT_PASSING_PERCENTAGE).unwrap();

        assert_eq!(result.total_questions, 4);
        assert_eq!(result.correct_answers, 2);
        assert_eq!(result.score_percentage, 50);
        assert!(!result.passed);
        assert_eq!(
            result.domain_scores["asking"],
            DomainScore {
                correct: 1,
                total: 2,
                percentage: 50,
            }
        );
        assert_eq!(result.domain_scores["reporting"].percentage, 100);
        assert_eq!(result.domain_scores["navigation"].percentage, 0);
        assert_eq!(result.answers.len(), 4);
        assert_eq!(result.answers[3].selected_answer, "");
        assert!(!result.answers[3].is_correct);
        assert_eq!(
            result
                .answers
                .iter()
                .map(|record| record.question_id.as_str())
                .collect::<Vec<_>>(),
            ["q1", "q2", "q3", "q4"]
        );
    }

    #[test]
    fn test_passing_threshold_is_inclusive() {
        let questions = (0..10)
            .map(|i| question(&format!("q{i}"), "asking", "a"))
            .collect::<Vec<_>>();
        let seven_right = (0..7)
            .map(|i| (format!("q{i}"), "a".to_string()))
            .collect::<HashMap<_, _>>();
        let result = score_exam(&questions, &seven_right, 70).unwrap();
        assert_eq!(result.score_percentage, 70);
        assert!(result.passed);
        assert!(!score_exam(&questions, &seven_right, 71).unwrap().passed);
    }

    #[test]
    fn test_rounding() {
        let questions = [
            question("q1", "d", "a"),
            question("q2", "d", "a"),
            question("q3", "d", "a"),
        ];
        let result = score_exam(&questions, &answers(&[("q1", "a"), ("q2", "a")]), 70).unwrap();
        // 66.67
        assert_eq!(result.score_percentage, 67);
        assert!(!result.passed);
    }

    #[test]
    fn test_empty_exam() {
        let result = score_exam(&[], &HashMap::new(), 0).unwrap();
        assert_eq!(result.score_percentage, 0);
        assert!(!result.passed);
        assert!(result.domain_scores.is_empty());
    }

    #[test]
    fn test_invalid_passing_percentage() {
        assert!(matches!(
            score_exam(&[], &HashMap::new(), 101),
            Err(SchedulerError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_timing() {
        let started = JAN_1_2025;
        assert_eq!(
            exam_expires_at(started, 90).unwrap(),
            started + 90 * MILLIS_PER_MINUTE
        );
        let expiry = started + 90 * MILLIS_PER_MINUTE;
        assert!(!is_exam_expired(started, 90, expiry).unwrap());
        assert!(is_exam_expired(started, 90, expiry + 1).unwrap());

        assert_eq!(remaining_time_seconds(started, 90, started).unwrap(), 5400);
        assert_eq!(remaining_time_seconds(started, 90, expiry - 1500).unwrap(), 1);
        assert_eq!(remaining_time_seconds(started, 90, expiry + 60_000).unwrap(), 0);

        assert_eq!(time_taken_minutes(started, started + 89_000).unwrap(), 1);
        assert_eq!(time_taken_minutes(started, started + 29_000).unwrap(), 0);
        assert!(time_taken_minutes(started, started - 1).is_err());
        assert!(is_exam_expired(-1, 90, started).is_err());
    }
}
