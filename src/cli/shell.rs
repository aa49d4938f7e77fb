use std::time::Duration;

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::{output, render, CliError};
use crate::client::{HttpPredictionClient, PredictionApi};
use crate::config::ConfigManager;
use crate::errors::FormError;
use crate::flow::{FlowController, ResultsView};
use crate::form::FormState;
use crate::schema::{self, FieldKey, FieldKind};
use crate::store::ResultStore;
use crate::utils;

const MAIN_MENU: &[&str] = &[
    "Start a new prediction",
    "View last results",
    "Check service health",
    "Quit",
];

pub fn run_cli() -> Result<(), CliError> {
    let config = ConfigManager::new()?.load()?;
    let client = HttpPredictionClient::new(&config)?;
    let store = ResultStore::new(utils::app_data_dir())?;
    let mut flow = FlowController::new(
        client,
        store,
        Duration::from_millis(config.confirmation_delay_ms),
    );

    output::section("Heart Disease Risk Assessment");
    output::info(format!("Prediction service: {}", config.api_base_url));

    loop {
        println!();
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Main menu")
            .items(MAIN_MENU)
            .default(0)
            .interact()?;
        match choice {
            0 => run_capture(&mut flow)?,
            1 => show_results(&mut flow),
            2 => show_health(&flow),
            _ => break,
        }
    }
    Ok(())
}

/// Walks the capture form group by group, then submits. Field errors are
/// rendered inline and send the user back to editing; remote failures leave
/// the form idle for a manual retry.
fn run_capture<C: PredictionApi>(flow: &mut FlowController<C>) -> Result<(), CliError> {
    // Starting over discards any previously held result.
    flow.new_prediction()?;

    if confirm("Load sample data first?")? {
        load_sample(flow);
    }

    loop {
        for group in schema::field_groups() {
            for key in *group {
                prompt_field(flow.form_mut(), *key)?;
            }
        }

        match flow.submit() {
            Ok(_) => {
                output::success("Prediction completed successfully!");
                output::info("Preparing your results...");
                flow.advance_to_results();
                show_results(flow);
                return Ok(());
            }
            Err(FormError::Invalid(errors)) => {
                output::warning("Some fields need attention:");
                for (key, error) in &errors {
                    println!("  {}: {error}", schema::definition_of(*key).label);
                }
                if !confirm("Edit the form and try again?")? {
                    return Ok(());
                }
            }
            Err(FormError::AlreadyInFlight) => return Ok(()),
            Err(FormError::Api(err)) => {
                output::error(err);
                return Ok(());
            }
        }
    }
}

fn prompt_field(form: &mut FormState, key: FieldKey) -> Result<(), CliError> {
    let definition = schema::definition_of(key);
    let theme = ColorfulTheme::default();
    match definition.kind {
        FieldKind::Number { min, max, .. } => {
            let mut input = Input::<String>::with_theme(&theme)
                .with_prompt(format!("{} ({min}-{max})", definition.label));
            if let Some(current) = form.value(key) {
                input = input.with_initial_text(current.to_string());
            }
            form.set_value(key, input.interact_text()?);
        }
        FieldKind::Selection { choices } => {
            let labels: Vec<&str> = choices.iter().map(|choice| choice.label).collect();
            let default = form
                .value(key)
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .and_then(|value| choices.iter().position(|choice| choice.value == value))
                .unwrap_or(0);
            let index = Select::with_theme(&theme)
                .with_prompt(definition.label)
                .items(&labels)
                .default(default)
                .interact()?;
            form.set_value(key, choices[index].value.to_string());
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, CliError> {
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&["Yes", "No"])
        .default(0)
        .interact()?;
    Ok(index == 0)
}

fn load_sample<C: PredictionApi>(flow: &mut FlowController<C>) {
    match flow.load_sample() {
        Ok(()) => output::success("Sample data loaded!"),
        Err(err) => output::error(format!("Failed to load sample data: {err}")),
    }
}

fn show_results<C: PredictionApi>(flow: &mut FlowController<C>) {
    match flow.enter_results() {
        ResultsView::Ready(result) => render::render_result(&result),
        ResultsView::Empty => render::render_empty_results(),
    }
}

fn show_health<C: PredictionApi>(flow: &FlowController<C>) {
    match flow.health() {
        Ok(report) => render::render_health(&report),
        Err(err) => output::error(format!("Health check failed: {err}")),
    }
}
