//! System instruction for PSI 20 annual-report answers.

/// Persona and topical scope sent as the system message of every completion.
///
/// Answers are spoken aloud afterwards, so the instruction also asks for a
/// speech-friendly style.
pub const SYSTEM_MESSAGE: &str = "As a PSI 20 expert, answer questions using context from companies' annual reports. Prioritize financial metrics (e.g., revenue, EBITDA), operations, and risks. Be precise, use data from reports, and note any limitations (e.g., 'Based on 2023 data'). Keep responses engaging for speech. Decline unrelated topics: 'My knowledge is limited to PSI 20 reports.'";

/// Canned answer returned when the request carries no question.
pub const EMPTY_QUERY_RESPONSE: &str = "Please enter a question.";
