//! Interactive dashboard session.
//!
//! Turns analyst commands into router triggers, filter and form updates,
//! and renders the current page after each of them. Recoverable failures
//! (bad input, unseen categories, missing model) come back as text and the
//! session carries on.

use crate::analytics::{AnalyticsReport, CurrencySelection};
use crate::config::ModelConfig;
use crate::form::{FormField, PredictionForm};
use crate::models::{InferenceEngine, ModelSource};
use crate::render;
use crate::repository::DataRepository;
use crate::router::{Page, Router, Trigger};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

pub const HELP: &str = "\
Commands:
  home | prediction          switch page
  show                       re-render the current page
  options                    list payment currencies
  currencies <A,B|all|none>  choose currencies (Home page)
  set <field> <value>        fill a form field (Prediction page)
  clear                      reset the form
  submit                     run the prediction
  help                       this text
  quit                       leave";

/// One line of analyst input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Navigate(Trigger),
    Show,
    Options,
    Currencies(CurrencyArg),
    Set(FormField, String),
    Clear,
    Submit,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CurrencyArg {
    All,
    None,
    Only(Vec<String>),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    Field(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "home" | "analytics" => Ok(Command::Navigate(Trigger::Home)),
            "prediction" | "predict" => Ok(Command::Navigate(Trigger::Prediction)),
            "show" => Ok(Command::Show),
            "options" => Ok(Command::Options),
            "currencies" => match rest.to_ascii_lowercase().as_str() {
                "" => Err(CommandError::Usage("currencies <A,B,...|all|none>")),
                "all" => Ok(Command::Currencies(CurrencyArg::All)),
                "none" => Ok(Command::Currencies(CurrencyArg::None)),
                _ => Ok(Command::Currencies(CurrencyArg::Only(
                    rest.split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                        .collect(),
                ))),
            },
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("set <field> <value>"))?;
                let field = field.parse::<FormField>().map_err(CommandError::Field)?;
                Ok(Command::Set(field, value.trim().to_string()))
            }
            "clear" => Ok(Command::Clear),
            "submit" => Ok(Command::Submit),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Dashboard state for one analyst.
pub struct Session<'a> {
    repo: &'a DataRepository,
    models: &'a dyn ModelSource,
    model_config: ModelConfig,
    router: Router,
    currency_options: Vec<String>,
    selection: CurrencySelection,
    form: PredictionForm,
    engine: Option<InferenceEngine>,
}

impl<'a> Session<'a> {
    pub fn new(
        repo: &'a DataRepository,
        models: &'a dyn ModelSource,
        model_config: ModelConfig,
    ) -> Self {
        let currency_options = repo.currency_options();
        let selection = CurrencySelection::new(currency_options.iter().cloned());

        Self {
            repo,
            models,
            model_config,
            router: Router::new(),
            currency_options,
            selection,
            form: PredictionForm::new(),
            engine: None,
        }
    }

    pub fn page(&self) -> Page {
        self.router.current()
    }

    pub fn selection(&self) -> &CurrencySelection {
        &self.selection
    }

    pub fn form(&self) -> &PredictionForm {
        &self.form
    }

    /// Parse and run one line of input.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        match line.parse::<Command>() {
            Ok(command) => self.handle(command),
            Err(CommandError::Empty) => Reply::Output(String::new()),
            Err(e) => Reply::Output(format!("Error: {}\n", e)),
        }
    }

    pub fn handle(&mut self, command: Command) -> Reply {
        let output = match command {
            Command::Navigate(trigger) => {
                let transition = self.router.handle(trigger);
                info!(from = %transition.from, to = %transition.to, "Page selected");
                if transition.to == Page::Prediction {
                    self.load_engine();
                }
                self.render()
            }
            Command::Show => self.render(),
            Command::Options => format!("Currencies: {}\n", self.currency_options.join(", ")),
            Command::Currencies(arg) => self.select_currencies(arg),
            Command::Set(field, value) => {
                if self.page() != Page::Prediction {
                    return Reply::Output(
                        "Error: the form lives on the Prediction page\n".to_string(),
                    );
                }
                self.form.set(field, value);
                format!("{} = {}\n", field.label(), self.form.get(field))
            }
            Command::Clear => {
                self.form.clear();
                "Form cleared\n".to_string()
            }
            Command::Submit => self.submit(),
            Command::Help => format!("{}\n", HELP),
            Command::Quit => return Reply::Quit,
        };
        Reply::Output(output)
    }

    /// Render the current page.
    pub fn render(&self) -> String {
        match self.page() {
            Page::Analytics => {
                let report = AnalyticsReport::build(self.repo, &self.selection);
                render::render_analytics(&report)
            }
            Page::Prediction => {
                let mut page = render::render_prediction_page(
                    &self.form,
                    self.engine.as_ref().map(|e| e.encoders()),
                );
                if self.engine.is_none() {
                    page.push_str("Model unavailable; predictions are disabled.\n");
                }
                page
            }
        }
    }

    fn load_engine(&mut self) {
        self.engine = match self.models.load() {
            Ok(classifier) => Some(InferenceEngine::from_config(
                self.repo.li_small(),
                classifier,
                &self.model_config,
            )),
            Err(e) => {
                warn!(error = %e, "Failed to load model");
                None
            }
        };
    }

    fn select_currencies(&mut self, arg: CurrencyArg) -> String {
        if self.page() != Page::Analytics {
            return "Error: the currency filter lives on the Home page\n".to_string();
        }

        self.selection = match arg {
            CurrencyArg::All => CurrencySelection::new(self.currency_options.iter().cloned()),
            CurrencyArg::None => CurrencySelection::none(),
            CurrencyArg::Only(list) => {
                match CurrencySelection::resolve(list, &self.currency_options) {
                    Ok(selection) => selection,
                    Err(e) => return format!("Error: {}; see `options`\n", e),
                }
            }
        };
        self.render()
    }

    fn submit(&mut self) -> String {
        if self.page() != Page::Prediction {
            return "Error: switch to the Prediction page first\n".to_string();
        }
        let Some(engine) = self.engine.as_mut() else {
            return "Error: model unavailable\n".to_string();
        };

        match engine.predict(&self.form) {
            Ok(report) => render::render_prediction(&report),
            Err(e) => format!("Error: {}\n", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::fixtures::valid_form;
    use crate::models::inference::testing::FixedClassifier;
    use crate::models::Classifier;
    use crate::repository::fixtures;

    struct FixedSource(f64);

    impl ModelSource for FixedSource {
        fn load(&self) -> anyhow::Result<Box<dyn Classifier>> {
            Ok(FixedClassifier::boxed(self.0))
        }
    }

    struct MissingSource;

    impl ModelSource for MissingSource {
        fn load(&self) -> anyhow::Result<Box<dyn Classifier>> {
            anyhow::bail!("Model file not found: models/xgboost.onnx")
        }
    }

    fn output(reply: Reply) -> String {
        match reply {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    fn fill(session: &mut Session<'_>, form: &PredictionForm) {
        for field in FormField::ALL {
            let reply = session.handle(Command::Set(field, form.get(field).to_string()));
            assert!(!output(reply).starts_with("Error"));
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("home".parse::<Command>(), Ok(Command::Navigate(Trigger::Home)));
        assert_eq!("Prediction".parse::<Command>(), Ok(Command::Navigate(Trigger::Prediction)));
        assert_eq!(
            "currencies Euro, US Dollar".parse::<Command>(),
            Ok(Command::Currencies(CurrencyArg::Only(vec![
                "Euro".to_string(),
                "US Dollar".to_string()
            ])))
        );
        assert_eq!("currencies ALL".parse::<Command>(), Ok(Command::Currencies(CurrencyArg::All)));
        assert_eq!(
            "set receiving_currency US Dollar".parse::<Command>(),
            Ok(Command::Set(FormField::ReceivingCurrency, "US Dollar".to_string()))
        );
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert!(matches!("set from_bank".parse::<Command>(), Err(CommandError::Usage(_))));
        assert!(matches!("set iban 12".parse::<Command>(), Err(CommandError::Field(_))));
        assert!(matches!("settings".parse::<Command>(), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_starts_on_home_with_all_currencies() {
        let repo = fixtures::repository();
        let source = FixedSource(0.9);
        let session = Session::new(&repo, &source, ModelConfig::default());

        assert_eq!(session.page(), Page::Analytics);
        assert_eq!(session.selection().len(), 4);
        assert!(session.render().contains("Data Dimension(li_small): 12 rows"));
    }

    #[test]
    fn test_currency_filter_rerenders() {
        let repo = fixtures::repository();
        let source = FixedSource(0.9);
        let mut session = Session::new(&repo, &source, ModelConfig::default());

        let page = output(session.handle_line("currencies Euro"));
        assert!(page.contains("Data Dimension(li_small): 3 rows"));

        let page = output(session.handle_line("currencies none"));
        assert!(page.contains("NaN"));

        let err = output(session.handle_line("currencies Bitcoin"));
        assert!(err.contains("unknown currencies: Bitcoin"));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_prediction_flow() {
        let repo = fixtures::repository();
        let source = FixedSource(0.9);
        let mut session = Session::new(&repo, &source, ModelConfig::default());

        let page = output(session.handle_line("prediction"));
        assert!(page.contains("Money Laundering: Prediction"));
        assert!(page.contains("Allowed values"));

        fill(&mut session, &valid_form());
        let first = output(session.handle_line("submit"));
        assert!(first.contains("**Suspect Laundering**"));

        // Resubmission runs again with the same inputs.
        let second = output(session.handle_line("submit"));
        assert!(second.contains("**Suspect Laundering**"));
    }

    #[test]
    fn test_invalid_input_keeps_session_usable() {
        let repo = fixtures::repository();
        let source = FixedSource(0.1);
        let mut session = Session::new(&repo, &source, ModelConfig::default());
        session.handle_line("prediction");

        fill(&mut session, &valid_form());
        output(session.handle_line("set to_bank 1.5"));
        let reply = output(session.handle_line("submit"));
        assert!(reply.starts_with("Error: please enter valid values for: To Bank"));
        assert_eq!(session.form().get(FormField::ToBank), "1.5");

        output(session.handle_line("set payment_currency Saudi Riyal"));
        output(session.handle_line("set to_bank 001"));
        let reply = output(session.handle_line("submit"));
        assert!(reply.contains("unseen category \"Saudi Riyal\""));

        output(session.handle_line("set payment_currency US Dollar"));
        let reply = output(session.handle_line("submit"));
        assert!(reply.contains("**Low Possibility of Laundering**"));
    }

    #[test]
    fn test_missing_model_is_reported_inline() {
        let repo = fixtures::repository();
        let source = MissingSource;
        let mut session = Session::new(&repo, &source, ModelConfig::default());

        let page = output(session.handle_line("prediction"));
        assert!(page.contains("Model unavailable"));

        let reply = output(session.handle_line("submit"));
        assert_eq!(reply, "Error: model unavailable\n");

        // Home still works.
        let page = output(session.handle_line("home"));
        assert!(page.contains("Dataset Description"));
    }

    #[test]
    fn test_page_scoped_commands() {
        let repo = fixtures::repository();
        let source = FixedSource(0.5);
        let mut session = Session::new(&repo, &source, ModelConfig::default());

        assert!(output(session.handle_line("set from_bank 10")).starts_with("Error"));
        assert!(output(session.handle_line("submit")).starts_with("Error"));

        session.handle_line("prediction");
        assert!(output(session.handle_line("currencies Euro")).starts_with("Error"));
        assert_eq!(session.handle_line("quit"), Reply::Quit);
    }
}
