//! Turtle and SPARQL composition for event records.
//!
//! Everything interpolated into a statement (payload copies, node ids,
//! event types, filter values) goes through [`escape_literal`] so quoting
//! and control characters in caller-supplied content cannot corrupt the
//! surrounding syntax.

use chrono::{DateTime, SecondsFormat, Utc};
use weft_types::Event;

/// Ontology namespace for event metadata terms.
pub const ONTOLOGY_NS: &str = "http://weft.dev/ontology/";

/// URI prefix event metadata subjects are minted under.
pub const EVENT_META_NS: &str = "http://weft.dev/events/meta/";

/// Prefix header shared by the SELECT queries.
pub const PREFIXES: &str = "\
PREFIX weft: <http://weft.dev/ontology/>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
";

/// Escapes a string for embedding in a double-quoted Turtle/SPARQL literal.
///
/// Backslash must be escaped first so the other escapes are not doubled.
pub fn escape_literal(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Formats a timestamp as an `xsd:dateTime` literal value.
pub fn datetime_literal(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Composes the metadata statement block for a stored event.
///
/// The raw payload is carried along as an escaped literal so a point lookup
/// can return it verbatim without re-serializing the materialized triples.
pub fn meta_turtle(event: &Event) -> String {
    format!(
        "\
@prefix weft: <{ns}> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

<{meta}{id}> a weft:Event ;
    weft:eventId \"{id}\" ;
    weft:sourceNode \"{source}\" ;
    weft:eventType \"{kind}\" ;
    weft:createdAt \"{created}\"^^xsd:dateTime ;
    weft:triplesPayload \"{payload}\" .
",
        ns = ONTOLOGY_NS,
        meta = EVENT_META_NS,
        id = event.id,
        source = escape_literal(&event.source_node),
        kind = escape_literal(&event.event_type),
        created = datetime_literal(&event.created_at),
        payload = escape_literal(&event.triples),
    )
}

/// Rewrites a Turtle document into a SPARQL `INSERT DATA` update.
///
/// `@prefix foo: <...> .` lines become `PREFIX foo: <...>` clauses ahead of
/// the update; the remaining statements land inside the `INSERT DATA` block
/// unchanged. This is the GraphDB dialect; its statements endpoint only
/// accepts SPARQL updates, not raw documents.
pub fn turtle_to_update(turtle: &str) -> String {
    let mut prefixes = Vec::new();
    let mut body = Vec::new();
    for line in turtle.lines() {
        let stripped = line.trim();
        if let Some(rest) = stripped.strip_prefix("@prefix") {
            prefixes.push(format!(
                "PREFIX{}",
                rest.trim_end().trim_end_matches('.').trim_end()
            ));
        } else {
            body.push(line);
        }
    }
    format!(
        "{}\nINSERT DATA {{\n{}\n}}",
        prefixes.join("\n"),
        body.join("\n")
    )
}

/// Builds the filtered listing query over event metadata, newest first.
///
/// `limit` is trusted here; the 1–500 bound is enforced at the HTTP boundary.
pub fn list_query(
    since: Option<&DateTime<Utc>>,
    event_type: Option<&str>,
    limit: i64,
) -> String {
    let mut filters = Vec::new();
    if let Some(since) = since {
        filters.push(format!(
            "FILTER(?createdAt >= \"{}\"^^xsd:dateTime)",
            datetime_literal(since)
        ));
    }
    if let Some(event_type) = event_type {
        filters.push(format!(
            "FILTER(?eventType = \"{}\")",
            escape_literal(event_type)
        ));
    }
    let filter_block = filters.join("\n    ");
    format!(
        "\
{PREFIXES}
SELECT ?eventId ?sourceNode ?eventType ?createdAt WHERE {{
    ?event a weft:Event ;
           weft:eventId ?eventId ;
           weft:sourceNode ?sourceNode ;
           weft:eventType ?eventType ;
           weft:createdAt ?createdAt .
    {filter_block}
}}
ORDER BY DESC(?createdAt)
LIMIT {limit}
"
    )
}

/// Builds the point-lookup query for a single event id.
///
/// Matches on the `weft:eventId` literal rather than minting a subject URI
/// from the caller-supplied id, so path input cannot inject IRI syntax.
pub fn get_query(event_id: &str) -> String {
    format!(
        "\
{PREFIXES}
SELECT ?sourceNode ?eventType ?createdAt ?triplesPayload WHERE {{
    ?event a weft:Event ;
           weft:eventId \"{id}\" ;
           weft:sourceNode ?sourceNode ;
           weft:eventType ?eventType ;
           weft:createdAt ?createdAt .
    OPTIONAL {{ ?event weft:triplesPayload ?triplesPayload . }}
}}
",
        id = escape_literal(event_id),
    )
}
