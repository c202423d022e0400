//! Prompt construction for the chat provider

use crate::model::{Category, PromptMessage};

/// Classification policy, output schema and few-shot examples
pub const CLASSIFICATION_SYSTEM_PROMPT: &str = include_str!("../prompts/classification_system.md");

/// Marker the reply prompt ends with; the model's answer follows it
pub const REPLY_MARKER: &str = "RESPOSTA:";

/// Build the two messages for a classification call.
///
/// The email body is embedded verbatim between `"""` delimiters.
pub fn build_classification_messages(email_body: &str) -> Vec<PromptMessage> {
    vec![
        PromptMessage::system(CLASSIFICATION_SYSTEM_PROMPT),
        PromptMessage::user(format!("EMAIL:\n\"\"\"\n{}\n\"\"\"", email_body)),
    ]
}

/// Build the reply-drafting prompt used by the two-step pipeline
pub fn build_reply_prompt(category: Category, email_body: &str) -> PromptMessage {
    let mut prompt = String::new();

    prompt.push_str(
        "Você é um assistente de atendimento ao cliente em uma empresa financeira. \
         Escreva uma resposta curta (até 120 palavras), educada e objetiva. \
         Se necessário, peça as informações mínimas para avançar.\n\n",
    );

    prompt.push_str("INSTRUÇÕES: ");
    match category {
        Category::Productive => prompt.push_str(
            "O email é PRODUTIVO. Proponha próximos passos claros e solicite os dados \
             essenciais que faltarem (ID da solicitação, CPF/CNPJ parcial ou número do \
             protocolo). Use tom profissional e cordial, sem jargão.",
        ),
        Category::Unproductive => prompt.push_str(
            "O email é IMPRODUTIVO (felicitações, agradecimentos ou assunto sem ação). \
             Responda de forma simpática e breve, sem criar demandas.",
        ),
    }
    prompt.push_str("\n\n");

    prompt.push_str("EMAIL DO CLIENTE:\n\"\"\"\n");
    prompt.push_str(email_body);
    prompt.push_str("\n\"\"\"\n\n");
    prompt.push_str(REPLY_MARKER);

    PromptMessage::user(prompt)
}

/// Keep only the text after the last reply marker, if the model echoed it
pub fn strip_reply_marker(text: &str) -> &str {
    match text.rfind(REPLY_MARKER) {
        Some(idx) => text[idx + REPLY_MARKER.len()..].trim(),
        None => text.trim(),
    }
}
