// Template-based text generation

use super::{json_schema_enum, json_schema_object, json_schema_string, named_enum};
use super::{optional_str, required_str};
use crate::error::HandlerError;
use crate::types::{Arguments, ToolDefinition};
use chrono::Local;
use serde_json::{json, Value};

named_enum! {
    /// Text templates
    Template {
        Greeting => "greeting",
        Farewell => "farewell",
        Email => "email",
        Report => "report",
    }
}

named_enum! {
    /// Output languages
    Language {
        Pt => "pt",
        En => "en",
        Es => "es",
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Pt
    }
}

pub(super) fn definition() -> ToolDefinition {
    let templates: Vec<&str> = Template::ALL.iter().map(Template::as_str).collect();
    let languages: Vec<&str> = Language::ALL.iter().map(Language::as_str).collect();

    let mut language = json_schema_enum(&languages, "Language of the generated text");
    language["default"] = json!(Language::default().as_str());

    ToolDefinition::new(
        "text_generator",
        "Template-based text generator",
        json_schema_object(
            json!({
                "template": json_schema_enum(&templates, "Kind of text to generate"),
                "name": json_schema_string("Name used to personalize the text"),
                "language": language
            }),
            vec!["template", "name"],
        ),
    )
    .with_capabilities(["text", "template", "generation"])
    .with_metadata("category", "text")
    .with_metadata("version", "1.1")
}

pub(super) fn execute(args: &Arguments) -> Result<Value, HandlerError> {
    let template_name = required_str(args, "template")?;
    let name = required_str(args, "name")?;
    let language_name = optional_str(args, "language")?.unwrap_or(Language::default().as_str());

    let template: Template = template_name
        .parse()
        .map_err(|_| HandlerError::InvalidTemplate(template_name.to_string()))?;
    let language: Language = language_name.parse().map_err(|_| {
        HandlerError::InvalidTemplate(format!("{} ({})", template_name, language_name))
    })?;

    Ok(json!({
        "text": render(template, language, name),
        "template": template.as_str(),
        "language": language.as_str(),
        "name": name
    }))
}

fn render(template: Template, language: Language, name: &str) -> String {
    match (template, language) {
        (Template::Greeting, Language::En) => {
            format!("Hello, {name}! Welcome to our MCP server.")
        }
        (Template::Greeting, Language::Es) => {
            format!("¡Hola, {name}! Bienvenido a nuestro servidor MCP.")
        }
        (Template::Greeting, Language::Pt) => {
            format!("Olá, {name}! Bem-vindo ao nosso servidor MCP.")
        }
        (Template::Farewell, Language::En) => {
            format!("Goodbye, {name}! Thank you for using our services.")
        }
        (Template::Farewell, Language::Es) => {
            format!("¡Adiós, {name}! Gracias por usar nuestros servicios.")
        }
        (Template::Farewell, Language::Pt) => {
            format!("Tchau, {name}! Obrigado por usar nossos serviços.")
        }
        (Template::Email, Language::En) => format!(
            "Dear {name},\n\nThis is an automated message from our MCP server.\n\nBest regards,\nMCP Team"
        ),
        (Template::Email, Language::Es) => format!(
            "Estimado/a {name},\n\nEste es un mensaje automatizado de nuestro servidor MCP.\n\nSaludos cordiales,\nEquipo MCP"
        ),
        (Template::Email, Language::Pt) => format!(
            "Caro(a) {name},\n\nEsta é uma mensagem automatizada do nosso servidor MCP.\n\nAtenciosamente,\nEquipe MCP"
        ),
        (Template::Report, language) => {
            let now = Local::now().format("%Y-%m-%d %H:%M:%S");
            match language {
                Language::En => format!("Report generated for: {name}\nDate: {now}\nStatus: Active"),
                Language::Es => format!("Informe generado para: {name}\nFecha: {now}\nEstado: Activo"),
                Language::Pt => format!("Relatório gerado para: {name}\nData: {now}\nStatus: Ativo"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(value: Value) -> Result<Value, HandlerError> {
        execute(value.as_object().unwrap())
    }

    #[test]
    fn test_greeting_en() {
        let result = run(json!({"template": "greeting", "name": "Ana", "language": "en"})).unwrap();
        assert_eq!(result["text"], "Hello, Ana! Welcome to our MCP server.");
        assert_eq!(result["template"], "greeting");
        assert_eq!(result["language"], "en");
        assert_eq!(result["name"], "Ana");
    }

    #[test]
    fn test_language_defaults_to_pt() {
        let result = run(json!({"template": "farewell", "name": "Ana"})).unwrap();
        assert_eq!(result["language"], "pt");
        assert_eq!(result["text"], "Tchau, Ana! Obrigado por usar nossos serviços.");
    }

    #[test]
    fn test_email_es() {
        let result = run(json!({"template": "email", "name": "Luis", "language": "es"})).unwrap();
        let text = result["text"].as_str().unwrap();
        assert!(text.starts_with("Estimado/a Luis,"));
        assert!(text.ends_with("Equipo MCP"));
    }

    #[test]
    fn test_report_embeds_date() {
        let result = run(json!({"template": "report", "name": "Ops", "language": "en"})).unwrap();
        let text = result["text"].as_str().unwrap();
        assert!(text.starts_with("Report generated for: Ops\nDate: "));
        assert!(text.ends_with("\nStatus: Active"));
    }

    #[test]
    fn test_invalid_template() {
        assert_eq!(
            run(json!({"template": "poem", "name": "Ana"})),
            Err(HandlerError::InvalidTemplate("poem".to_string()))
        );
    }

    #[test]
    fn test_unknown_language() {
        assert_eq!(
            run(json!({"template": "greeting", "name": "Ana", "language": "fr"})),
            Err(HandlerError::InvalidTemplate("greeting (fr)".to_string()))
        );
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(
            run(json!({"template": "greeting"})),
            Err(HandlerError::MissingArgument("name"))
        );
    }
}
