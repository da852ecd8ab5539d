use criterion::{black_box, criterion_group, criterion_main, Criterion};

use assessgate_core::cache::EvaluationCache;
use assessgate_core::evaluate_assessment;
use assessgate_core::model::*;
use assessgate_core::response::{FileDescriptor, ResponseMap, ResponseValue};
use assessgate_core::validator::validate;

/// Builds `sections` sections of six questions, one of each type, where
/// every question after the first depends on its predecessor.
fn make_assessment(sections: usize) -> Assessment {
    let mut previous: Option<String> = None;
    let sections = (0..sections)
        .map(|s| {
            let questions = [
                QuestionType::ShortText,
                QuestionType::LongText,
                QuestionType::Numeric,
                QuestionType::SingleChoice,
                QuestionType::MultiChoice,
                QuestionType::FileUpload,
            ]
            .into_iter()
            .enumerate()
            .map(|(i, question_type)| {
                let id = format!("s{s}-q{i}");
                let mut q = Question::new(&id, question_type)
                    .with_required(i % 2 == 0)
                    .with_options(["A", "B", "C"])
                    .with_validation(ValidationRule {
                        min_length: Some(2),
                        max_length: Some(200),
                        pattern: Some(r"^[\w\s.,]+$".into()),
                        min: Some(1.0),
                        max: Some(3.0),
                        file_types: Some(vec!["pdf".into(), "docx".into()]),
                        max_file_size: Some(5.0),
                        ..Default::default()
                    });
                if let Some(dep) = previous.replace(id) {
                    q = q.with_rule(ConditionalRule::new(
                        dep,
                        Condition::IsNotEmpty,
                        None,
                        RuleAction::Show,
                    ));
                }
                q
            })
            .collect();
            Section {
                id: format!("s{s}"),
                title: format!("Section {s}"),
                questions,
            }
        })
        .collect();

    Assessment {
        id: "bench".into(),
        title: "Bench".into(),
        job_id: "bench-job".into(),
        sections,
    }
}

fn make_responses(assessment: &Assessment) -> ResponseMap {
    let mut responses = ResponseMap::new();
    for q in assessment.questions() {
        let value = match q.question_type {
            QuestionType::ShortText | QuestionType::LongText => {
                ResponseValue::from("Five years of backend work")
            }
            QuestionType::Numeric => ResponseValue::from(2.0),
            QuestionType::SingleChoice => ResponseValue::from("B"),
            QuestionType::MultiChoice => ResponseValue::selections(["A", "C"]),
            QuestionType::FileUpload => FileDescriptor::new("resume.pdf", 1_500_000).into(),
        };
        responses.set(q.id.clone(), value);
    }
    responses
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let assessment = make_assessment(1);
    let responses = make_responses(&assessment);

    for q in assessment.questions() {
        group.bench_function(q.question_type.to_string(), |b| {
            b.iter(|| validate(black_box(q), responses.get(&q.id), black_box(&responses)))
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_assessment");

    for sections in [1, 10, 100] {
        let assessment = make_assessment(sections);
        let responses = make_responses(&assessment);
        group.bench_function(format!("{} questions", sections * 6), |b| {
            b.iter(|| evaluate_assessment(black_box(&assessment), black_box(&responses)))
        });
    }

    let assessment = make_assessment(100);
    let responses = make_responses(&assessment);
    let mut cache = EvaluationCache::new();
    group.bench_function("600 questions cached", |b| {
        b.iter(|| cache.evaluate(black_box(&assessment), black_box(&responses)))
    });

    group.finish();
}

criterion_group!(benches, bench_validate, bench_evaluate);
criterion_main!(benches);
