use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skillcheck_core::model::{AnswerOption, Assessment, Question, QuestionType};
use skillcheck_core::results::{Grade, ScoreResult};
use skillcheck_core::scoring::score;
use skillcheck_core::statistics::compute_result_stats;
use skillcheck_core::submission::Submission;

fn make_assessment(n: usize) -> Assessment {
    let questions = (0..n)
        .map(|i| {
            let question_type = if i % 3 == 0 {
                QuestionType::TrueFalse
            } else {
                QuestionType::MultipleChoice
            };
            let options = (0..4)
                .map(|o| AnswerOption {
                    id: format!("q{i}-o{o}"),
                    text: if o == 0 { "True".into() } else { format!("Option {o}") },
                    is_correct: o == 0,
                    order: o,
                })
                .collect();
            Question {
                id: format!("q{i}"),
                question: format!("Question {i}"),
                question_type,
                points: (i % 5 + 1) as u32,
                options,
                explanation: None,
                order: i as u32,
            }
        })
        .collect();

    Assessment {
        id: "bench".into(),
        title: "Bench".into(),
        description: String::new(),
        passing_score: 70.0,
        duration_minutes: None,
        questions,
    }
}

fn make_submission(assessment: &Assessment, every: usize) -> Submission {
    let mut submission = Submission::default();
    for (i, q) in assessment.questions.iter().enumerate() {
        if i % every == 0 {
            continue;
        }
        let value = match q.question_type {
            QuestionType::TrueFalse => "true".to_string(),
            _ => q.options[i % 4].id.clone(),
        };
        submission = submission.with_answer(q.id.clone(), value);
    }
    submission
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    for n in [10usize, 100, 1000] {
        let assessment = make_assessment(n);
        let submission = make_submission(&assessment, 7);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| score(black_box(&assessment), black_box(&submission)))
        });
    }

    let assessment = make_assessment(100);
    let empty = Submission::default();
    group.bench_function("empty_submission", |b| {
        b.iter(|| score(black_box(&assessment), black_box(&empty)))
    });

    group.finish();
}

fn bench_stats(c: &mut Criterion) {
    let results: Vec<ScoreResult> = (0..1000)
        .map(|i| {
            let score = (i % 101) as f64;
            ScoreResult {
                total_questions: 10,
                correct_answers: 5,
                wrong_answers: 5,
                skipped_questions: 0,
                total_points: 10,
                points_earned: 5,
                score,
                passed: score >= 70.0,
                grade: Grade::from_score(score),
                feedback: String::new(),
            }
        })
        .collect();

    c.bench_function("result_stats/1000", |b| {
        b.iter(|| compute_result_stats(black_box(&results)))
    });
}

criterion_group!(benches, bench_score, bench_stats);
criterion_main!(benches);
