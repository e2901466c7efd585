//! Máquina de estados del ciclo de vida de averías
//!
//! Tabla explícita de transiciones permitidas, validada en la frontera de
//! comandos. Se permite avanzar a lo largo de la cadena (incluyendo saltos
//! hacia adelante, p.ej. reported -> in_repair cuando la avería se arregló
//! en sitio), pero nunca retroceder ni salir de resolved/closed.

use crate::models::breakdown::BreakdownStatus;
use crate::utils::errors::AppError;

/// Posición de cada estado en la cadena del ciclo de vida
fn rank(status: BreakdownStatus) -> u8 {
    match status {
        BreakdownStatus::Reported => 0,
        BreakdownStatus::Acknowledged => 1,
        BreakdownStatus::Diagnosing => 2,
        BreakdownStatus::AwaitingParts => 3,
        BreakdownStatus::InRepair => 4,
        BreakdownStatus::Resolved => 5,
        BreakdownStatus::Closed => 6,
    }
}

/// ¿Es legal la transición from -> to?
pub fn can_transition(from: BreakdownStatus, to: BreakdownStatus) -> bool {
    if from == to {
        return true;
    }
    // resolved solo puede avanzar a closed; closed es terminal absoluto
    match from {
        BreakdownStatus::Closed => false,
        BreakdownStatus::Resolved => to == BreakdownStatus::Closed,
        _ => rank(to) > rank(from),
    }
}

/// Estado destino por defecto al asignar una avería: acknowledged si todavía
/// no se ha reconocido, el estado actual si ya está más adelante en la cadena.
/// Reasignar nunca retrocede el ciclo de vida.
pub fn assignment_target(current: BreakdownStatus) -> BreakdownStatus {
    if rank(current) < rank(BreakdownStatus::Acknowledged) {
        BreakdownStatus::Acknowledged
    } else {
        current
    }
}

/// Validar una transición en la frontera de comandos
pub fn validate_transition(
    from: BreakdownStatus,
    to: BreakdownStatus,
) -> Result<(), AppError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid breakdown transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_steps_are_allowed() {
        assert!(can_transition(BreakdownStatus::Reported, BreakdownStatus::Acknowledged));
        assert!(can_transition(BreakdownStatus::Acknowledged, BreakdownStatus::Diagnosing));
        assert!(can_transition(BreakdownStatus::InRepair, BreakdownStatus::Resolved));
        assert!(can_transition(BreakdownStatus::Resolved, BreakdownStatus::Closed));
    }

    #[test]
    fn test_forward_jumps_are_allowed() {
        // arreglo en sitio: reported -> in_repair directo
        assert!(can_transition(BreakdownStatus::Reported, BreakdownStatus::InRepair));
        assert!(can_transition(BreakdownStatus::Reported, BreakdownStatus::Resolved));
    }

    #[test]
    fn test_backward_jumps_are_rejected() {
        assert!(!can_transition(BreakdownStatus::Diagnosing, BreakdownStatus::Reported));
        assert!(!can_transition(BreakdownStatus::InRepair, BreakdownStatus::AwaitingParts));
    }

    #[test]
    fn test_terminal_states_cannot_reopen() {
        assert!(!can_transition(BreakdownStatus::Closed, BreakdownStatus::InRepair));
        assert!(!can_transition(BreakdownStatus::Resolved, BreakdownStatus::Diagnosing));
        assert!(can_transition(BreakdownStatus::Resolved, BreakdownStatus::Closed));
    }

    #[test]
    fn test_self_transition_is_a_noop() {
        assert!(can_transition(BreakdownStatus::Diagnosing, BreakdownStatus::Diagnosing));
    }

    #[test]
    fn test_assignment_target_never_moves_backward() {
        assert_eq!(
            assignment_target(BreakdownStatus::Reported),
            BreakdownStatus::Acknowledged
        );
        assert_eq!(
            assignment_target(BreakdownStatus::Diagnosing),
            BreakdownStatus::Diagnosing
        );
        assert_eq!(
            assignment_target(BreakdownStatus::InRepair),
            BreakdownStatus::InRepair
        );
        // el destino por defecto siempre pasa la tabla de transiciones
        for current in [
            BreakdownStatus::Reported,
            BreakdownStatus::Acknowledged,
            BreakdownStatus::AwaitingParts,
            BreakdownStatus::Resolved,
        ] {
            assert!(can_transition(current, assignment_target(current)));
        }
    }

    #[test]
    fn test_validate_transition_reports_states() {
        let err = validate_transition(BreakdownStatus::Closed, BreakdownStatus::Reported)
            .unwrap_err();
        assert!(err.to_string().contains("closed -> reported"));
    }
}
