//! Display lookup tables for audit codes.
//!
//! Every lookup is total: codes missing from a table are returned unchanged.

use chrono::{DateTime, NaiveDateTime};

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Returns the localized label for an audit action code.
#[must_use]
pub fn format_action(action: &str) -> &str {
    action_label(action).unwrap_or(action)
}

/// Returns the localized label for an audit resource type code.
#[must_use]
pub fn format_resource_type(resource_type: &str) -> &str {
    resource_type_label(resource_type).unwrap_or(resource_type)
}

/// Returns the badge CSS classes for an audit action code.
#[must_use]
pub fn action_badge_color(action: &str) -> &str {
    action_color(action).unwrap_or(action)
}

/// Formats a backend timestamp as `dd/mm/yyyy HH:MM:SS`.
///
/// Accepts RFC 3339 values and naive ISO datetimes; anything else is returned
/// as received.
#[must_use]
pub fn format_date(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.format(DISPLAY_DATE_FORMAT).to_string();
    }

    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|parsed| parsed.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| timestamp.to_owned())
}

fn action_label(action: &str) -> Option<&'static str> {
    let label = match action {
        "CREATE_USER" => "Criar Usuário",
        "UPDATE_USER" => "Atualizar Usuário",
        "DELETE_USER" => "Excluir Usuário",
        "BLOCK_USER" => "Bloquear Usuário",
        "UNBLOCK_USER" => "Desbloquear Usuário",
        "ROLE_CHANGE" => "Alterar Função",
        "LOGIN" => "Login",
        "LOGOUT" => "Logout",
        "LOGIN_FAILED" => "Falha de Login",
        "PASSWORD_CHANGE" => "Alterar Senha",
        "UPDATE_CONFIG" => "Atualizar Configuração",
        "RESET_CONFIG" => "Restaurar Configurações",
        "INITIALIZE_CONFIG" => "Inicializar Configurações",
        "CLEANUP_LOGS" => "Limpar Logs",
        "EXPORT_DATA" => "Exportar Dados",
        _ => return None,
    };

    Some(label)
}

fn resource_type_label(resource_type: &str) -> Option<&'static str> {
    let label = match resource_type {
        "USER" => "Usuário",
        "SYSTEM_CONFIG" => "Configuração do Sistema",
        "AUDIT_LOG" => "Log de Auditoria",
        "TRANSACTION" => "Transação",
        "CATEGORY" => "Categoria",
        "AUTH" => "Autenticação",
        "REPORT" => "Relatório",
        _ => return None,
    };

    Some(label)
}

fn action_color(action: &str) -> Option<&'static str> {
    let color = match action {
        "CREATE_USER" | "UNBLOCK_USER" | "INITIALIZE_CONFIG" => "bg-green-100 text-green-800",
        "UPDATE_USER" | "UPDATE_CONFIG" | "PASSWORD_CHANGE" | "ROLE_CHANGE" => {
            "bg-blue-100 text-blue-800"
        }
        "DELETE_USER" | "BLOCK_USER" | "LOGIN_FAILED" => "bg-red-100 text-red-800",
        "RESET_CONFIG" | "CLEANUP_LOGS" => "bg-yellow-100 text-yellow-800",
        "LOGIN" | "LOGOUT" => "bg-gray-100 text-gray-800",
        "EXPORT_DATA" => "bg-purple-100 text-purple-800",
        _ => return None,
    };

    Some(color)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{action_badge_color, format_action, format_date, format_resource_type};

    #[test]
    fn known_codes_map_to_labels() {
        assert_eq!(format_action("CREATE_USER"), "Criar Usuário");
        assert_eq!(format_resource_type("SYSTEM_CONFIG"), "Configuração do Sistema");
        assert_eq!(action_badge_color("DELETE_USER"), "bg-red-100 text-red-800");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(format_action("UNKNOWN_ACTION"), "UNKNOWN_ACTION");
        assert_eq!(format_resource_type("WIDGET"), "WIDGET");
        assert_eq!(action_badge_color(""), "");
    }

    #[test]
    fn dates_render_in_display_format() {
        assert_eq!(format_date("2024-03-05T14:07:09"), "05/03/2024 14:07:09");
        assert_eq!(format_date("2024-03-05T14:07:09.123456"), "05/03/2024 14:07:09");
        assert_eq!(format_date("2024-03-05T14:07:09+00:00"), "05/03/2024 14:07:09");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    proptest! {
        #[test]
        fn lookups_are_total(code in "[A-Z_]{0,24}x") {
            prop_assert_eq!(format_action(&code), code.as_str());
            prop_assert_eq!(format_resource_type(&code), code.as_str());
            prop_assert_eq!(action_badge_color(&code), code.as_str());
        }
    }
}
