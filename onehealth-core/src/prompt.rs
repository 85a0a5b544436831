//! Request text construction for both exchanges.
//!
//! Everything here is pure string assembly so it stays unit-testable without
//! a backend. User-visible output is required to be in Bahasa Indonesia; the
//! instruction text itself is English, matching the assistant preamble.

use crate::message::SourceDocument;
use crate::prediction::{InterventionSet, ModelKind, PredictionRequest};

/// System preamble for the chat assistant.
pub const CHAT_PREAMBLE: &str = "You are a helpful AI assistant for the One Health Platform. Your name is One AI. You specialize in topics related to human, animal, and environmental health, particularly zoonotic diseases. You must answer in Bahasa Indonesia. Be friendly and informative.";

/// System preamble for the prediction analyst.
pub const PREDICTION_PREAMBLE: &str = "You are an epidemiological data analyst for the One Health Platform. You respond only with a single valid JSON object matching the requested schema, with no surrounding prose.";

const CONTEXT_INSTRUCTION: &str = "Use the information in the context below to answer my question. The context may contain content from uploaded documents and/or a list of reference links. Prefer the document content, but also use the links for additional information where relevant. If the answer is not present in the provided sources, say that you cannot find the information.";

/// Prefix a user message with the knowledge-base context block. With an empty
/// context the message passes through untouched.
pub fn with_context(message: &str, context: &str) -> String {
    if context.trim().is_empty() {
        return message.to_string();
    }
    format!("{CONTEXT_INSTRUCTION}\n\n---\nContext:\n{context}\n---\n\nMy question: {message}")
}

/// Assemble uploaded documents and reference links into one context string.
/// Either part may be absent; both absent yields an empty string.
pub fn assemble_context(documents: &[SourceDocument], links: &[String]) -> String {
    let mut parts = Vec::new();

    if !documents.is_empty() {
        let rendered: Vec<String> = documents
            .iter()
            .map(|doc| format!("Nama File: {}\n\n{}", doc.name, doc.content))
            .collect();
        parts.push(format!("Konten Dokumen:\n{}", rendered.join("\n\n---\n\n")));
    }

    if !links.is_empty() {
        let rendered: Vec<String> = links.iter().map(|link| format!("- {link}")).collect();
        parts.push(format!("Tautan Referensi:\n{}", rendered.join("\n")));
    }

    parts.join("\n\n---\n\n")
}

fn methodology_block(model: ModelKind) -> &'static str {
    match model {
        ModelKind::RandomForest => {
            "Focus on identifying the main predictive factors in the data and how an ensemble of decision trees would interpret the trends. The prediction should reflect an aggregation of multiple predictive paths."
        }
        ModelKind::LinearRegression => {
            "Focus on identifying clear linear trends, seasonality, and the slope of case growth. The prediction should be a projection based on these linear relationships."
        }
        ModelKind::Lstm => {
            "Focus on capturing long-range dependencies and complex sequential patterns in the time series that simpler models would miss."
        }
        ModelKind::TemporalFusionTransformer => {
            "Perform multi-horizon forecasting that interprets multiple features of the historical data, identifying long-term trends and sudden shifts, the way a transformer model weighs different parts of the input sequence."
        }
    }
}

fn intervention_block(interventions: &InterventionSet) -> String {
    if interventions.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = interventions
        .iter()
        .map(|(intervention, pct)| {
            format!("- {} (estimated effectiveness {}%)", intervention.label(), pct)
        })
        .collect();
    format!(
        "\nNext, consider the potential impact of the following public-health interventions currently applied at the stated effectiveness levels:\n{}\nYour analysis, risk assessment, recommendations and chart projection must reflect how these interventions, at the stated levels, could change the disease trajectory compared to the historical data alone. Higher effectiveness must lead to a larger reduction of predicted cases.\n",
        lines.join("\n")
    )
}

/// Build the full prediction instruction embedding every request input.
pub fn build_prediction_prompt(request: &PredictionRequest) -> String {
    let model_label = request.model.label();
    format!(
        "Analyze the following CSV data for {name}: {description}\n\
         The data represents reported cases over time.\n\
         IMPORTANT: All text in your JSON response (insights, recommendations) MUST be in Bahasa Indonesia.\n\
         \n\
         CSV data:\n\
         ```csv\n\
         {csv}\n\
         ```\n\
         \n\
         Analysis model: apply the principles of the **{model}** methodology. {methodology}\n\
         {interventions}\n\
         Based on the data, the chosen analysis model, and any listed interventions, provide a detailed analysis and prediction as a single JSON object with exactly these fields:\n\
         1. \"insights\": a short paragraph (2-3 sentences) in Bahasa Indonesia summarizing the main trends and patterns according to the {model} methodology; if interventions are listed, mention their likely impact.\n\
         2. \"riskLevel\": the current outbreak risk, exactly one of \"Low\", \"Medium\", \"High\" or \"Very High\".\n\
         3. \"recommendations\": a list of 3-5 actionable recommendations in Bahasa Indonesia.\n\
         4. \"chartData\": an array of {{\"name\": string, \"cases\": number, \"predicted\": number}} points. Project the case counts for the next {months} months; for those future periods set \"predicted\" and omit \"cases\". Before the projection include the last 5 actual data points with \"cases\" set and \"predicted\" omitted.\n\
         \n\
         Respond with valid JSON only, without prose or markdown fences.",
        name = request.disease.name,
        description = request.disease.description,
        csv = request.csv_data,
        model = model_label,
        methodology = methodology_block(request.model),
        interventions = intervention_block(&request.interventions),
        months = request.prediction_months,
    )
}
