use crate::parser::PlateEvent;
use ahash::AHashMap;

/// All readings of one exact plate string.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateRecord {
    pub text: String,
    pub confidences: Vec<f64>,
    pub frames: Vec<u64>,
}

impl PlateRecord {
    fn new(text: String) -> Self {
        Self { text, confidences: Vec::new(), frames: Vec::new() }
    }

    pub fn detections(&self) -> usize { self.frames.len() }

    pub fn mean_confidence(&self) -> f64 {
        self.confidences.iter().sum::<f64>() / self.confidences.len() as f64
    }
}

/// Plate text -> readings, kept in first-seen order.
///
/// Grouping walks records in this order, so it decides both which texts seed
/// clusters and how representative ties are broken.
#[derive(Debug, Clone, Default)]
pub struct PlateAggregate {
    records: Vec<PlateRecord>,
    index: AHashMap<String, usize>,
}

impl PlateAggregate {
    pub fn new() -> Self { Self::default() }

    pub fn from_events<I: IntoIterator<Item = PlateEvent>>(events: I) -> Self {
        let mut agg = Self::new();
        for ev in events { agg.push(ev); }
        agg
    }

    pub fn push(&mut self, event: PlateEvent) {
        let PlateEvent { frame_number, plate_text, confidence } = event;
        let idx = match self.index.get(&plate_text) {
            Some(&i) => i,
            None => {
                let i = self.records.len();
                self.index.insert(plate_text.clone(), i);
                self.records.push(PlateRecord::new(plate_text));
                i
            }
        };
        let rec = &mut self.records[idx];
        rec.confidences.push(confidence);
        rec.frames.push(frame_number);
    }

    pub fn get(&self, text: &str) -> Option<&PlateRecord> {
        self.index.get(text).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, PlateRecord> { self.records.iter() }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.text.as_str())
    }

    /// Hand the records over in discovery order.
    pub fn into_records(self) -> Vec<PlateRecord> { self.records }
}

impl FromIterator<PlateEvent> for PlateAggregate {
    fn from_iter<T: IntoIterator<Item = PlateEvent>>(iter: T) -> Self {
        Self::from_events(iter)
    }
}

impl<'a> IntoIterator for &'a PlateAggregate {
    type Item = &'a PlateRecord;
    type IntoIter = std::slice::Iter<'a, PlateRecord>;

    fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}
