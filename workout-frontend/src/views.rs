//! Page templates and the mapping from controller state to a rendered page.

use crate::utils::dates::long_date;
use askama::Template;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use workout_core::models::{Exercise, SavedWorkout, WorkoutPlan};
use workout_core::validation::{Sex, WorkoutForm};
use workout_core::{Notice, NoticeLevel, ViewController, ViewState};

pub struct NoticeView {
    pub class: &'static str,
    pub message: String,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        let class = match notice.level {
            NoticeLevel::Info => "notice-info",
            NoticeLevel::Success => "notice-success",
            NoticeLevel::Error => "notice-error",
        };
        Self {
            class,
            message: notice.message,
        }
    }
}

pub struct SexOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct ExerciseView {
    pub name: String,
    pub orientation: String,
    pub details: Vec<String>,
}

impl From<&Exercise> for ExerciseView {
    fn from(exercise: &Exercise) -> Self {
        let details = [
            ("Duração", &exercise.duration),
            ("Séries", &exercise.sets),
            ("Repetições", &exercise.reps),
            ("Descanso", &exercise.rest),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
        .collect();

        Self {
            name: exercise.name.clone(),
            orientation: exercise.orientation.clone(),
            details,
        }
    }
}

pub struct SectionView {
    pub title: &'static str,
    pub exercises: Vec<ExerciseView>,
}

/// A plan laid out for display, sections in the order they are performed.
pub struct PlanView {
    pub message: String,
    pub focus: String,
    pub sections: Vec<SectionView>,
}

impl From<&WorkoutPlan> for PlanView {
    fn from(plan: &WorkoutPlan) -> Self {
        let outline = plan.outline();
        Self {
            message: outline.introduction.message.clone(),
            focus: outline.introduction.focus.clone(),
            sections: outline
                .sections()
                .into_iter()
                .map(|(section, exercises)| SectionView {
                    title: section.title(),
                    exercises: exercises.iter().map(ExerciseView::from).collect(),
                })
                .collect(),
        }
    }
}

pub struct SavedRow {
    pub id: String,
    pub focus: String,
    pub date: String,
}

impl From<&SavedWorkout> for SavedRow {
    fn from(saved: &SavedWorkout) -> Self {
        Self {
            id: saved.id.clone(),
            focus: saved.focus.clone(),
            date: long_date(&saved.date),
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub notices: Vec<NoticeView>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "generator.html")]
pub struct GeneratorPage {
    pub email: String,
    pub notices: Vec<NoticeView>,
    pub draft: WorkoutForm,
    pub sex_options: Vec<SexOption>,
    pub result: Option<PlanView>,
}

#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryPage {
    pub email: String,
    pub notices: Vec<NoticeView>,
    pub workouts: Vec<SavedRow>,
}

#[derive(Template)]
#[template(path = "history_detail.html")]
pub struct HistoryDetailPage {
    pub email: String,
    pub notices: Vec<NoticeView>,
    pub workout: SavedRow,
    pub plan: PlanView,
}

fn sex_options(draft: &WorkoutForm) -> Vec<SexOption> {
    Sex::CHOICES
        .iter()
        .map(|sex| SexOption {
            value: sex.as_str().to_string(),
            label: sex.label().to_string(),
            selected: draft.sex == sex.as_str(),
        })
        .collect()
}

fn generator(
    email: String,
    notices: Vec<NoticeView>,
    draft: WorkoutForm,
    result: Option<PlanView>,
) -> Response {
    GeneratorPage {
        email,
        notices,
        sex_options: sex_options(&draft),
        draft,
        result,
    }
    .into_response()
}

/// Renders the page for the controller's current view, draining its notices.
pub fn render(controller: &mut ViewController) -> Response {
    let notices: Vec<NoticeView> = controller
        .take_notices()
        .into_iter()
        .map(NoticeView::from)
        .collect();
    let email = controller
        .session()
        .map(|session| session.email.clone())
        .unwrap_or_default();

    match controller.state() {
        ViewState::LoggedOut => {
            let error = controller.login_error().map(str::to_string);
            let status = if error.is_some() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::OK
            };
            (status, LoginPage { notices, error }).into_response()
        }
        ViewState::GeneratorIdle { draft } => generator(email, notices, draft.clone(), None),
        ViewState::Generating { request } => {
            generator(email, notices, WorkoutForm::from(request), None)
        }
        ViewState::ResultShown { request, plan } => generator(
            email,
            notices,
            WorkoutForm::from(request),
            Some(PlanView::from(plan)),
        ),
        ViewState::HistoryList { workouts } => HistoryPage {
            email,
            notices,
            workouts: workouts.iter().map(SavedRow::from).collect(),
        }
        .into_response(),
        ViewState::HistoryDetail { selected, .. } => HistoryDetailPage {
            email,
            notices,
            workout: SavedRow::from(selected),
            plan: PlanView::from(&selected.plan),
        }
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exercise_details_skip_missing_fields() {
        let exercise: Exercise = serde_json::from_value(json!({
            "exercicio": "Agachamento",
            "series": 4,
            "repeticoes": "15",
            "orientacao": "Peso nos calcanhares"
        }))
        .unwrap();

        let view = ExerciseView::from(&exercise);

        assert_eq!(view.details, vec!["Séries: 4", "Repetições: 15"]);
    }

    #[test]
    fn test_selected_sex_is_marked() {
        let draft = WorkoutForm {
            sex: "feminino".to_string(),
            ..Default::default()
        };

        let options = sex_options(&draft);
        let selected: Vec<&str> = options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.label.as_str())
            .collect();

        assert_eq!(selected, vec!["Feminino"]);
    }
}
