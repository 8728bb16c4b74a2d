use crate::domain::model::{BadgeRecord, BadgeType, Corrections, Exceptions, Ticket, TypeIds};

/// Category derived from the ticket's `type.id` alone.
///
/// Ids are checked in attendee, speaker, sponsor, staff order and a later
/// match replaces an earlier one, so duplicated ids resolve to the last
/// category.
pub fn derive_category(type_id: &str, type_ids: &TypeIds) -> Option<BadgeType> {
    [
        (&type_ids.attendee, BadgeType::Attendee),
        (&type_ids.speaker, BadgeType::Speaker),
        (&type_ids.sponsor, BadgeType::Sponsor),
        (&type_ids.staff, BadgeType::Staff),
    ]
    .into_iter()
    .filter(|(id, _)| id.as_str() == type_id)
    .map(|(_, category)| category)
    .last()
}

/// Turns fetched tickets into badge records, keeping fetch order.
pub fn badge_records(
    tickets: Vec<Ticket>,
    type_ids: &TypeIds,
    exceptions: &Exceptions,
    corrections: &Corrections,
) -> Vec<BadgeRecord> {
    let mut records = Vec::with_capacity(tickets.len());

    for ticket in tickets {
        let mut category = derive_category(&ticket.ticket_type.id, type_ids);

        if let Some(forced) = exceptions.get(&ticket.token) {
            category = forced.or(category).or(Some(BadgeType::Attendee));
            tracing::debug!(
                "Exception applied to ticket {}: {:?}",
                ticket.token,
                category
            );
        }

        let Some(badge_type) = category else {
            tracing::debug!(
                "Skipping ticket {} with unknown type id {}",
                ticket.token,
                ticket.ticket_type.id
            );
            continue;
        };

        let (firstname, lastname) = match corrections.get(&ticket.token) {
            Some((firstname, lastname)) => {
                tracing::debug!("Correcting name on ticket {}", ticket.token);
                (firstname.clone(), lastname.clone())
            }
            None => (
                ticket.firstname.unwrap_or_default(),
                ticket.lastname.unwrap_or_default(),
            ),
        };

        records.push(BadgeRecord {
            firstname,
            lastname,
            token: ticket.token,
            badge_type,
        });
    }

    records
}
