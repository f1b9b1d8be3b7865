//! Analogy prompt construction.

use crate::generator::ChatPrompt;

/// System message framing the model.
pub const ANALOGY_SYSTEM_MESSAGE: &str = "Eres una experta en pedagogía y razonamiento analógico.";

/// Style used when the client sends none.
pub const DEFAULT_STYLE: &str = "general";

/// Context for one analogy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogyPrompt<'a> {
	/// Target principle
	pub principle: &'a str,
	/// Base domain environment
	pub environment: &'a str,
	/// Base domain interest
	pub interest: &'a str,
	/// Preferred sensory modality
	pub modality: &'a str,
	/// Requested style; blank means [`DEFAULT_STYLE`]
	pub style: Option<&'a str>,
}

impl AnalogyPrompt<'_> {
	/// Effective style.
	#[must_use]
	pub fn style(&self) -> &str {
		self.style
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.unwrap_or(DEFAULT_STYLE)
	}

	/// The user message sent to the model.
	#[must_use]
	pub fn render(&self) -> String {
		format!(
			"Actúa como una experta en pedagogía y razonamiento analógico.\n\
			 Utiliza un enfoque de analogías contextualizadas.\n\
			 Estilo solicitado: {style}.\n\
			 \n\
			 Dominio base (contexto conocido): {environment}, con interés vivencial en {interest}.\n\
			 Dominio objetivo: el principio ISO \"{principle}\".\n\
			 Modalidad sensorial preferida: {modality}.\n\
			 \n\
			 Genera una analogía educativa clara, breve (máx 120-180 palabras),\n\
			 con correspondencias estructurales y un ejemplo práctico aplicable al contexto del estudiante.",
			style = self.style(),
			environment = self.environment,
			interest = self.interest,
			principle = self.principle,
			modality = self.modality,
		)
	}

	/// System plus user message.
	#[must_use]
	pub fn to_chat(&self) -> ChatPrompt {
		ChatPrompt {
			system: ANALOGY_SYSTEM_MESSAGE.to_owned(),
			user: self.render(),
		}
	}
}
