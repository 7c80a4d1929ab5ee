//! Minimal XML helpers for the SOAP bodies ARCA returns.
//!
//! The responses are small and rigidly shaped, so tag extraction by string
//! search is enough; no full parser is pulled in.

/// Extracts the text content of the first `<tag>` occurrence, tolerating a
/// namespace prefix (`<ns2:tag>`).
#[must_use]
pub fn extraer_tag(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    if let Some(inicio) = xml.find(&open) {
        let desde = inicio + open.len();
        if let Some(fin) = xml[desde..].find(&close) {
            return Some(xml[desde..desde + fin].trim().to_string());
        }
    }

    // Variant with any namespace prefix.
    let patron = format!(":{tag}>");
    if let Some(pos_dos_puntos) = xml.find(&patron) {
        let antes = &xml[..pos_dos_puntos];
        if let Some(pos_menor) = antes.rfind('<') {
            let prefijo = &xml[pos_menor + 1..pos_dos_puntos];
            let desde = pos_dos_puntos + patron.len();
            let cierre = format!("</{prefijo}:{tag}>");
            if let Some(fin) = xml[desde..].find(&cierre) {
                return Some(xml[desde..desde + fin].trim().to_string());
            }
        }
    }

    None
}

/// Extracts every `<tag>...</tag>` block in document order, content only.
#[must_use]
pub fn extraer_bloques(xml: &str, tag: &str) -> Vec<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let mut bloques = Vec::new();
    let mut resto = xml;

    while let Some(inicio) = resto.find(&open) {
        let desde = inicio + open.len();
        let Some(fin) = resto[desde..].find(&close) else {
            break;
        };
        bloques.push(resto[desde..desde + fin].to_string());
        resto = &resto[desde + fin + close.len()..];
    }

    bloques
}

/// Escapes the five XML-reserved characters for element content.
#[must_use]
pub fn escapar(texto: &str) -> String {
    let mut salida = String::with_capacity(texto.len());
    for c in texto.chars() {
        match c {
            '&' => salida.push_str("&amp;"),
            '<' => salida.push_str("&lt;"),
            '>' => salida.push_str("&gt;"),
            '"' => salida.push_str("&quot;"),
            '\'' => salida.push_str("&apos;"),
            _ => salida.push(c),
        }
    }
    salida
}

/// Unescapes content that arrived embedded inside another XML document
/// (WSAA returns the login ticket response escaped in the SOAP body).
#[must_use]
pub fn desescapar(texto: &str) -> String {
    texto
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraer_tag_simple() {
        let xml = "<resp><token>abc123</token></resp>";
        assert_eq!(extraer_tag(xml, "token"), Some("abc123".to_string()));
        assert_eq!(extraer_tag(xml, "sign"), None);
    }

    #[test]
    fn test_extraer_tag_con_prefijo() {
        let xml = "<soap:Body><ns2:Resultado>A</ns2:Resultado></soap:Body>";
        assert_eq!(extraer_tag(xml, "Resultado"), Some("A".to_string()));
    }

    #[test]
    fn test_extraer_bloques_multiples() {
        let xml = "<Errors><Err><Code>1</Code></Err><Err><Code>2</Code></Err></Errors>";
        let bloques = extraer_bloques(xml, "Err");
        assert_eq!(bloques.len(), 2);
        assert_eq!(extraer_tag(&bloques[1], "Code"), Some("2".to_string()));
    }

    #[test]
    fn test_escape_roundtrip() {
        let original = r#"Ferretería "El Tornillo" <SA> & Cía"#;
        assert_eq!(desescapar(&escapar(original)), original);
    }
}
