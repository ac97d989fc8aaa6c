use std::any;

use smuggler_error::{DecodeError, ErrorExt};

use super::Smuggled;
use crate::{
    logging::status_event,
    pubsub::{Message, PayloadValue, SenderRef},
};

/// Собирает конверт: канал типа `T`, необязательный отправитель и карта
/// ровно из одной записи `payload_key(T) → value`.
pub fn build_envelope<T: Smuggled>(
    value: T,
    sender: Option<&SenderRef>,
) -> Message {
    let mut message = Message::new(T::channel_name());
    message.sender = sender.cloned();
    message
        .payload
        .insert(T::payload_key(), PayloadValue::new(value));
    message
}

/// Извлекает значение типа `T` из сообщения.
///
/// # Ошибки
/// - [`DecodeError::MissingPayload`] если в карте нет `payload_key(T)`
/// - [`DecodeError::TypeMismatch`] если под ключом лежит значение другого
///   типа
pub fn try_decode<T: Smuggled>(message: &Message) -> Result<T, DecodeError> {
    let key = T::payload_key();
    let value = message
        .get(&key)
        .ok_or_else(|| DecodeError::MissingPayload {
            key: key.to_string(),
            channel: message.channel.to_string(),
        })?;

    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| DecodeError::TypeMismatch {
            channel: message.channel.to_string(),
            expected: any::type_name::<T>().to_string(),
            found: value.type_name().to_string(),
        })
}

/// То же, что [`try_decode`], но ошибка только логируется с уровнем,
/// который задаёт её [`StatusCode`](smuggler_error::StatusCode).
///
/// Используется там, где одно испорченное сообщение не должно прерывать
/// обработку остальных.
pub fn decode<T: Smuggled>(message: &Message) -> Option<T> {
    match try_decode(message) {
        Ok(value) => Some(value),
        Err(err) => {
            let status = err.status_code();
            match &err {
                DecodeError::MissingPayload { key, channel } => status_event!(
                    status,
                    status = %status,
                    channel = %channel,
                    key = %key,
                    "Message dropped: {err}"
                ),
                DecodeError::TypeMismatch {
                    channel,
                    expected,
                    found,
                } => status_event!(
                    status,
                    status = %status,
                    channel = %channel,
                    expected = %expected,
                    found = %found,
                    "Message dropped: {err}"
                ),
            }
            None
        }
    }
}
