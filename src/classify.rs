use crate::error::{NormaliseError, Result};
use crate::types::InputValue;

/// The recognised structural shapes of an input value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Text,
    Bytes,
    Blob,
    /// Only meaningful as a sequence element; a top-level integer is
    /// unrecognised input
    Integer,
    PullStream,
    SyncSequence,
    AsyncSequence,
    FileObject,
}

/// Decide which recognised shape a value has
///
/// Classification is structural and pure: it never polls or advances a
/// sequence, so classifying the same unconsumed value twice yields the same
/// shape. The arms are kept in dependency order: byte buffers are
/// recognised before the sequence shapes (a buffer is itself iterable), and
/// the record check comes only after the sequence checks because stream
/// handles may carry an incidental `path` that must not reclassify them.
pub fn classify(value: &InputValue) -> Result<Shape> {
    match value {
        InputValue::Absent => Err(NormaliseError::AbsentInput),
        InputValue::Text(_) => Ok(Shape::Text),
        InputValue::Bytes(_) => Ok(Shape::Bytes),
        InputValue::Blob(_) => Ok(Shape::Blob),
        InputValue::Integer(_) => Ok(Shape::Integer),
        InputValue::PullStream(_) => Ok(Shape::PullStream),
        InputValue::Iter(_) => Ok(Shape::SyncSequence),
        InputValue::Stream(_) => Ok(Shape::AsyncSequence),
        InputValue::Record(record) if record.is_file_object() => Ok(Shape::FileObject),
        InputValue::Record(_) => Err(NormaliseError::UnexpectedInput {
            type_name: value.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Blob, FileInput, StreamSource};
    use futures::stream;
    use futures::StreamExt;

    #[test]
    fn classifies_scalar_shapes() {
        assert_eq!(classify(&InputValue::from("text")).unwrap(), Shape::Text);
        assert_eq!(
            classify(&InputValue::from(vec![1u8, 2])).unwrap(),
            Shape::Bytes
        );
        assert_eq!(
            classify(&InputValue::from(Blob::new(vec![0u8]))).unwrap(),
            Shape::Blob
        );
        assert_eq!(classify(&InputValue::Integer(9)).unwrap(), Shape::Integer);
    }

    #[test]
    fn classifies_sequence_shapes() {
        let sync = InputValue::sequence(vec![InputValue::from("a")]);
        assert_eq!(classify(&sync).unwrap(), Shape::SyncSequence);

        let items: Vec<Result<InputValue>> = vec![Ok(InputValue::from("a"))];
        let asynchronous = InputValue::stream(stream::iter(items));
        assert_eq!(classify(&asynchronous).unwrap(), Shape::AsyncSequence);
    }

    #[test]
    fn classifies_records_with_path_or_content() {
        let with_path = InputValue::from(FileInput {
            path: Some("dir".to_string()),
            ..Default::default()
        });
        assert_eq!(classify(&with_path).unwrap(), Shape::FileObject);

        let with_content = InputValue::from(FileInput {
            content: Some(Box::new(InputValue::from("x"))),
            ..Default::default()
        });
        assert_eq!(classify(&with_content).unwrap(), Shape::FileObject);
    }

    #[test]
    fn absent_input_is_an_error() {
        assert!(matches!(
            classify(&InputValue::Absent),
            Err(NormaliseError::AbsentInput)
        ));
    }

    #[test]
    fn record_without_fields_is_unrecognised() {
        let empty = InputValue::from(FileInput::default());
        assert!(matches!(
            classify(&empty),
            Err(NormaliseError::UnexpectedInput {
                type_name: "object"
            })
        ));
    }

    #[test]
    fn stream_with_incidental_path_is_a_sequence_not_a_record() {
        let items: Vec<Result<InputValue>> = vec![Ok(InputValue::from("a"))];
        let source = StreamSource::new(stream::iter(items)).with_path("carried-along.txt");
        assert_eq!(
            classify(&InputValue::Stream(source)).unwrap(),
            Shape::AsyncSequence
        );
    }

    #[tokio::test]
    async fn classification_does_not_consume_the_sequence() {
        let items: Vec<Result<InputValue>> =
            vec![Ok(InputValue::from("a")), Ok(InputValue::from("b"))];
        let value = InputValue::stream(stream::iter(items));

        assert_eq!(classify(&value).unwrap(), Shape::AsyncSequence);
        assert_eq!(classify(&value).unwrap(), Shape::AsyncSequence);

        let drained = value.into_sequence().unwrap();
        assert_eq!(drained.count().await, 2);
    }
}
