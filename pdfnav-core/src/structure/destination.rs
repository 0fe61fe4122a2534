//! PDF destinations according to ISO 32000-1 Section 12.3.2
//!
//! A destination value is stored either as an array `[page /Type params...]`
//! or as a dictionary whose `/D` entry holds that array. [`StoredDestination`]
//! is the only place that looks at which of the two shapes is in use; the rest
//! of the crate works on the decoded [`Destination`].

use crate::error::ResolutionFailure;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::store::PageHandle;

/// PDF destination types
#[derive(Debug, Clone, PartialEq)]
pub enum DestinationType {
    /// Display page with coordinates (left, top) at upper-left corner
    XYZ {
        left: Option<f64>,
        top: Option<f64>,
        zoom: Option<f64>,
    },
    /// Fit entire page in window
    Fit,
    /// Fit width of page in window
    FitH { top: Option<f64> },
    /// Fit height of page in window
    FitV { left: Option<f64> },
    /// Fit rectangle in window
    FitR {
        left: f64,
        bottom: f64,
        right: f64,
        top: f64,
    },
    /// Fit page bounding box in window
    FitB,
    /// Fit width of bounding box
    FitBH { top: Option<f64> },
    /// Fit height of bounding box
    FitBV { left: Option<f64> },
    /// Any other view name, parameters kept verbatim
    Other { name: String, params: Vec<Object> },
}

impl DestinationType {
    fn from_parts(name: &str, params: &[Object]) -> Self {
        let number = |i: usize| params.get(i).and_then(Object::as_real);
        match name {
            "XYZ" => DestinationType::XYZ {
                left: number(0),
                top: number(1),
                zoom: number(2),
            },
            "Fit" => DestinationType::Fit,
            "FitH" => DestinationType::FitH { top: number(0) },
            "FitV" => DestinationType::FitV { left: number(0) },
            "FitR" if params.len() == 4 => DestinationType::FitR {
                left: number(0).unwrap_or(0.0),
                bottom: number(1).unwrap_or(0.0),
                right: number(2).unwrap_or(0.0),
                top: number(3).unwrap_or(0.0),
            },
            "FitB" => DestinationType::FitB,
            "FitBH" => DestinationType::FitBH { top: number(0) },
            "FitBV" => DestinationType::FitBV { left: number(0) },
            _ => DestinationType::Other {
                name: name.to_string(),
                params: params.to_vec(),
            },
        }
    }

    /// The view name as written in the destination array
    pub fn name(&self) -> &str {
        match self {
            DestinationType::XYZ { .. } => "XYZ",
            DestinationType::Fit => "Fit",
            DestinationType::FitH { .. } => "FitH",
            DestinationType::FitV { .. } => "FitV",
            DestinationType::FitR { .. } => "FitR",
            DestinationType::FitB => "FitB",
            DestinationType::FitBH { .. } => "FitBH",
            DestinationType::FitBV { .. } => "FitBV",
            DestinationType::Other { name, .. } => name,
        }
    }

    /// View parameters following the view name
    pub fn params(&self) -> Vec<Object> {
        let opt = |v: &Option<f64>| v.map(Object::Real).unwrap_or(Object::Null);
        match self {
            DestinationType::XYZ { left, top, zoom } => vec![opt(left), opt(top), opt(zoom)],
            DestinationType::Fit | DestinationType::FitB => Vec::new(),
            DestinationType::FitH { top } | DestinationType::FitBH { top } => vec![opt(top)],
            DestinationType::FitV { left } | DestinationType::FitBV { left } => vec![opt(left)],
            DestinationType::FitR {
                left,
                bottom,
                right,
                top,
            } => vec![
                Object::Real(*left),
                Object::Real(*bottom),
                Object::Real(*right),
                Object::Real(*top),
            ],
            DestinationType::Other { params, .. } => params.clone(),
        }
    }

    pub fn is_xyz(&self) -> bool {
        matches!(self, DestinationType::XYZ { .. })
    }
}

/// Page destination reference
#[derive(Debug, Clone, PartialEq)]
pub enum PageDestination {
    /// Page object reference
    PageRef(ObjectId),
    /// Page number (0-based), as used by remote destinations
    PageNumber(u32),
    /// Anything else found in the page slot
    Unknown(Object),
}

impl PageDestination {
    fn from_object(object: &Object) -> Self {
        match object {
            Object::Reference(id) => PageDestination::PageRef(*id),
            Object::Integer(n) if *n >= 0 => PageDestination::PageNumber(*n as u32),
            other => PageDestination::Unknown(other.clone()),
        }
    }

    fn to_object(&self) -> Object {
        match self {
            PageDestination::PageRef(id) => Object::Reference(*id),
            PageDestination::PageNumber(n) => Object::Integer(*n as i64),
            PageDestination::Unknown(object) => object.clone(),
        }
    }
}

/// PDF destination
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    /// Target page
    pub page: PageDestination,
    /// Destination type
    pub dest_type: DestinationType,
}

impl Destination {
    /// Create Fit destination
    pub fn fit(page: PageHandle) -> Self {
        Self {
            page: PageDestination::PageRef(page.id()),
            dest_type: DestinationType::Fit,
        }
    }

    /// Create XYZ destination
    pub fn xyz(page: PageHandle, left: Option<f64>, top: Option<f64>, zoom: Option<f64>) -> Self {
        Self {
            page: PageDestination::PageRef(page.id()),
            dest_type: DestinationType::XYZ { left, top, zoom },
        }
    }

    /// Decodes a plain destination array.
    pub fn from_array(items: &[Object]) -> Result<Self, ResolutionFailure> {
        let (first, rest) = items.split_first().ok_or(ResolutionFailure::Malformed)?;
        let dest_type = match rest.split_first() {
            Some((view, params)) => match view.as_text() {
                Some(name) => DestinationType::from_parts(name, params),
                None => DestinationType::Other {
                    name: String::new(),
                    params: rest.to_vec(),
                },
            },
            // a bare page reference behaves like Fit in viewers
            None => DestinationType::Fit,
        };
        Ok(Self {
            page: PageDestination::from_object(first),
            dest_type,
        })
    }

    /// The page object this destination points at.
    pub fn page_handle(&self) -> Result<PageHandle, ResolutionFailure> {
        match &self.page {
            PageDestination::PageRef(id) => Ok(PageHandle::new(*id)),
            PageDestination::PageNumber(n) => {
                Err(ResolutionFailure::NotAReference(format!("page number {n}")))
            }
            PageDestination::Unknown(object) => {
                Err(ResolutionFailure::NotAReference(object.type_name().to_string()))
            }
        }
    }

    /// Points the destination at another page, keeping the view.
    pub fn retarget(&mut self, page: PageHandle) {
        self.page = PageDestination::PageRef(page.id());
    }

    /// Replaces an XYZ view with Fit. Returns whether anything changed.
    pub fn coerce_to_fit(&mut self) -> bool {
        if self.dest_type.is_xyz() {
            self.dest_type = DestinationType::Fit;
            true
        } else {
            false
        }
    }

    /// Convert to PDF array
    pub fn to_array(&self) -> Vec<Object> {
        let mut arr = vec![self.page.to_object(), Object::name(self.dest_type.name())];
        arr.extend(self.dest_type.params());
        arr
    }
}

/// Physical shape a destination value was found in.
#[derive(Debug, Clone, PartialEq)]
pub enum DestinationEncoding {
    /// `[page /View ...]`
    Array,
    /// `<< /D [page /View ...] ... >>`; the remaining entries are kept
    Wrapped(Dictionary),
}

/// A decoded destination together with the shape it has to be written back in.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDestination {
    pub destination: Destination,
    pub encoding: DestinationEncoding,
}

impl StoredDestination {
    /// Normalizes either physical shape into a [`Destination`].
    pub fn decode(value: &Object) -> Result<Self, ResolutionFailure> {
        match value {
            Object::Array(items) => Ok(Self {
                destination: Destination::from_array(items)?,
                encoding: DestinationEncoding::Array,
            }),
            Object::Dictionary(dict) => {
                let items = dict
                    .get("D")
                    .and_then(Object::as_array)
                    .ok_or(ResolutionFailure::Malformed)?;
                let mut rest = dict.clone();
                rest.remove("D");
                Ok(Self {
                    destination: Destination::from_array(items)?,
                    encoding: DestinationEncoding::Wrapped(rest),
                })
            }
            _ => Err(ResolutionFailure::Malformed),
        }
    }

    /// Writes the destination back in the shape it was read in.
    pub fn encode(&self) -> Object {
        let array = Object::Array(self.destination.to_array());
        match &self.encoding {
            DestinationEncoding::Array => array,
            DestinationEncoding::Wrapped(rest) => {
                let mut dict = rest.clone();
                dict.set("D", array);
                Object::Dictionary(dict)
            }
        }
    }
}
