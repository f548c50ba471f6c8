use actix_multipart::{Multipart, MultipartError};
use actix_web::web::Bytes;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures_util::{Stream, StreamExt, pin_mut};

pub const AVATAR_FIELD: &str = "avatar";
pub const BIO_FIELD: &str = "bio";
pub const COMPANY_NAME_FIELD: &str = "company_name";
pub const ACCEPTED_MEDIA: &str = "image/*";

#[derive(thiserror::Error, Debug)]
pub enum AvatarError {
    #[error("Not an image: {0}")]
    NotAnImage(String),
    #[error("Image is larger than {0} bytes")]
    TooLarge(usize),
    #[error("Upload failed: {0}")]
    Upload(#[from] MultipartError),
}

pub fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

fn is_image(media_type: &str) -> bool {
    media_type.split_once('/').map_or(false, |(kind, sub)| kind.eq_ignore_ascii_case("image") && !sub.is_empty())
}

/// Reads one selected file into a `data:` URL. `Ok(None)` means nothing was selected.
/// The whole field is consumed even when it gets rejected.
pub async fn read_file<S>(media_type: Option<&str>, chunks: S, limit: usize) -> Result<Option<String>, AvatarError>
    where S: Stream<Item = Result<Bytes, MultipartError>> {
    let media_type = media_type.unwrap_or("application/octet-stream");
    let accepted = is_image(media_type);
    pin_mut!(chunks);
    let mut bytes = Vec::new();
    let mut too_large = false;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        if !accepted || too_large {
            continue;
        }
        if bytes.len() + chunk.len() > limit {
            too_large = true;
            bytes.clear();
        } else {
            bytes.extend_from_slice(&chunk);
        }
    }
    if !accepted {
        Err(AvatarError::NotAnImage(media_type.to_string()))
    } else if too_large {
        Err(AvatarError::TooLarge(limit))
    } else if bytes.is_empty() {
        Ok(None)
    } else {
        Ok(Some(encode_data_url(media_type, &bytes)))
    }
}

async fn read_text<S>(chunks: S, limit: usize) -> Result<String, AvatarError>
    where S: Stream<Item = Result<Bytes, MultipartError>> {
    pin_mut!(chunks);
    let mut bytes = Vec::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        if bytes.len() + chunk.len() > limit {
            return Err(AvatarError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// The about form as sent by the upload button: the text typed so far plus the picked file.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub bio: Option<String>,
    pub company_name: Option<String>,
    pub avatar: Option<String>,
    /// Why the picked file was not taken. The text fields still count.
    pub rejected: Option<AvatarError>,
}

/// Browsers send an unnamed, empty part when the picker was left empty,
/// which counts as no selection. A broken upload fails as a whole.
pub async fn read_upload(mut payload: Multipart, limit: usize) -> Result<UploadForm, AvatarError> {
    let mut form = UploadForm::default();
    while let Some(field) = payload.next().await {
        let field = field?;
        let name = field.name().to_string();
        match name.as_str() {
            BIO_FIELD => form.bio = Some(read_text(field, limit).await?),
            COMPANY_NAME_FIELD => form.company_name = Some(read_text(field, limit).await?),
            AVATAR_FIELD => {
                let selected = field.content_disposition().get_filename().map_or(false, |x| !x.is_empty());
                let media_type = field.content_type().map(|x| x.essence_str().to_string());
                let read = if selected {
                    read_file(media_type.as_deref(), field, limit).await
                } else {
                    read_text(field, limit).await.map(|_| None)
                };
                match read {
                    Ok(avatar) => form.avatar = avatar,
                    Err(AvatarError::Upload(e)) => return Err(AvatarError::Upload(e)),
                    Err(e) => form.rejected = Some(e),
                }
            },
            _ => {
                read_text(field, limit).await?;
            },
        }
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use futures_util::stream;

    use super::*;

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, MultipartError>> {
        stream::iter(parts.iter().map(|x| Ok(Bytes::from_static(x))).collect::<Vec<_>>())
    }

    #[actix_web::test]
    async fn encodes_image_as_data_url() {
        let url = read_file(Some("image/png"), chunks(&[b"\x89PN", b"G"]), 1024).await.unwrap();
        assert_eq!(url.as_deref(), Some("data:image/png;base64,iVBORw=="));
    }

    #[actix_web::test]
    async fn empty_file_is_no_selection() {
        let url = read_file(Some("image/jpeg"), chunks(&[]), 1024).await.unwrap();
        assert_eq!(url, None);
    }

    #[actix_web::test]
    async fn rejects_other_media() {
        let result = read_file(Some("text/plain"), chunks(&[b"hello"]), 1024).await;
        assert!(matches!(result, Err(AvatarError::NotAnImage(_))));
        let result = read_file(None, chunks(&[b"hello"]), 1024).await;
        assert!(matches!(result, Err(AvatarError::NotAnImage(_))));
    }

    #[actix_web::test]
    async fn rejects_oversized_files() {
        let result = read_file(Some("image/gif"), chunks(&[b"0123", b"4567"]), 6).await;
        assert!(matches!(result, Err(AvatarError::TooLarge(6))));
    }

    #[actix_web::test]
    async fn read_errors_propagate() {
        let failing = stream::iter(vec![Ok(Bytes::from_static(b"ab")), Err(MultipartError::Incomplete)]);
        let result = read_file(Some("image/png"), failing, 1024).await;
        assert!(matches!(result, Err(AvatarError::Upload(_))));
    }
}
